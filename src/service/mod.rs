//! 解析サービス連携
//!
//! - AnalysisRequest: 送信時点の入力のコピー
//! - AnalysisService: 外部サービスの境界（テストでは差し替える）
//! - HttpAnalysisService: multipart で POST する実装

mod http;

pub use http::{interpret_response, HttpAnalysisService, IMAGE_FILE_NAME};

use async_trait::async_trait;
use crop_ai_common::{CropType, Diagnosis, Season};
use thiserror::Error;

/// サービスが `error` を返さなかった場合のメッセージ
pub const SERVICE_FALLBACK_MESSAGE: &str = "Failed to analyze image";

/// 通信エラー・不正レスポンス時のメッセージ
pub const GENERIC_FAILURE_MESSAGE: &str = "Error analyzing crop. Please try again.";

/// 1回分の解析リクエスト（値で保持するので送信後のフォーム変更は影響しない）
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub image: Vec<u8>,
    pub mime_type: &'static str,
    pub crop: CropType,
    pub season: Season,
}

/// 解析の失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisFailure {
    /// 接続できない・通信が切れた
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx以外のステータス
    #[error("service error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Service { status: u16, message: Option<String> },

    /// 2xxだが本文が読めない・必須項目がない
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl AnalysisFailure {
    /// 画面に出すメッセージ
    pub fn user_message(&self) -> String {
        match self {
            AnalysisFailure::Service {
                message: Some(message),
                ..
            } => message.clone(),
            AnalysisFailure::Service { message: None, .. } => SERVICE_FALLBACK_MESSAGE.to_string(),
            AnalysisFailure::Transport(_) | AnalysisFailure::Malformed(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// 外部の解析サービス
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<Diagnosis, AnalysisFailure>;
}
