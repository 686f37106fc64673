use anyhow::Context;
use clap::Parser;
use crop_ai_rust::{cli, config, presenter, service, workflow};
use crop_ai_common::{CropType, Season};
use cli::{Cli, Commands};
use config::Config;
use presenter::{present, render_text, Screen};
use service::HttpAnalysisService;
use std::sync::Arc;
use workflow::{Session, SubmissionState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = Config::load().context("設定ファイルの読み込みに失敗しました")?;
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| config.resolved_endpoint());

    match cli.command {
        Commands::Analyze { image, crop, season, json } => {
            eprintln!("🌱 crop-ai - 病害診断\n");

            let service = Arc::new(HttpAnalysisService::new(&endpoint)?);
            let mut session = Session::new(service);

            // 1. 画像選択
            eprintln!("[1/2] 画像を読み込み中...");
            if session.select_image_path(&image).is_err() {
                emit(&present(session.workflow()), json)?;
                std::process::exit(2);
            }
            if let Some(crop) = crop {
                session.set_crop_type(crop);
            }
            if let Some(season) = season {
                session.set_season(season);
            }

            // 2. 解析
            eprintln!("[2/2] 解析中... ({})", endpoint);
            if session.submit().is_err() {
                emit(&present(session.workflow()), json)?;
                std::process::exit(2);
            }
            session.settle().await;
            log::debug!("最終状態: {}", session.workflow().state().as_str());

            emit(&present(session.workflow()), json)?;
            if matches!(session.workflow().state(), SubmissionState::Failed(_)) {
                std::process::exit(1);
            }
        }

        Commands::Health => {
            let service = HttpAnalysisService::new(&endpoint)?;
            let health = service
                .health()
                .await
                .with_context(|| format!("{} に接続できません", service.health_url()))?;

            println!("サービス: {}", endpoint);
            println!("  状態: {}", health.status);
            println!("  モデル: {}", if health.model_loaded { "読込済み" } else { "未読込" });
            println!("  クラス数: {}", health.class_names_count);
            if !health.is_healthy() {
                std::process::exit(1);
            }
        }

        Commands::Options => {
            let crops: Vec<&str> = CropType::ALL.iter().map(|c| c.as_str()).collect();
            let seasons: Vec<&str> = Season::ALL.iter().map(|s| s.as_str()).collect();
            println!("作物: {}", crops.join(", "));
            println!("季節: {}", seasons.join(", "));
        }

        Commands::Config { set_endpoint, show } => {
            let mut config = config;

            if let Some(url) = set_endpoint {
                config.set_endpoint(url)?;
                println!("✔ エンドポイントを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint);
                println!("  使用中: {}", config.resolved_endpoint());
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn emit(screen: &Screen, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(screen)?);
    } else {
        print!("{}", render_text(screen));
    }
    Ok(())
}
