use crate::input::ValidationError;
use crate::service::AnalysisFailure;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropAiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("解析エラー: {0}")]
    Analysis(#[from] AnalysisFailure),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] crop_ai_common::Error),
}

pub type Result<T> = std::result::Result<T, CropAiError>;
