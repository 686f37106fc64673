use clap::{Parser, Subcommand};
use crop_ai_common::{CropType, Season};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crop-ai")]
#[command(about = "作物画像AI病害診断クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 解析サービスのURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を送信して病害を診断
    Analyze {
        /// 作物の画像ファイル（5MB以下）
        #[arg(required = true)]
        image: PathBuf,

        /// 作物の種類 (Wheat/Rice/Corn/Soybean/Cotton/Potato/Tomato/Apple/Grape/Other)
        #[arg(short, long)]
        crop: Option<CropType>,

        /// 季節 (Spring/Summer/Monsoon/Autumn/Winter)
        #[arg(short, long)]
        season: Option<Season>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 解析サービスの稼働確認
    Health,

    /// 選択できる作物・季節の一覧
    Options,

    /// 設定を表示/編集
    Config {
        /// エンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "crop-ai", "analyze", "leaf.jpg", "--crop", "tomato", "--season", "Monsoon",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { image, crop, season, json } => {
                assert_eq!(image, PathBuf::from("leaf.jpg"));
                assert_eq!(crop, Some(CropType::Tomato));
                assert_eq!(season, Some(Season::Monsoon));
                assert!(!json);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_rejects_unknown_crop() {
        let result = Cli::try_parse_from(["crop-ai", "analyze", "leaf.jpg", "--crop", "Banana"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_global_endpoint() {
        let cli = Cli::try_parse_from(["crop-ai", "health", "--endpoint", "http://10.0.0.5:5000"]).unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://10.0.0.5:5000"));
        assert!(matches!(cli.command, Commands::Health));
    }
}
