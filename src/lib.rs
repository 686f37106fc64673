//! 作物画像AI病害診断クライアント
//!
//! 画像取り込み → 送信ワークフロー → 結果表示 の一方向の流れ

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod presenter;
pub mod service;
pub mod workflow;

pub use crop_ai_common::{CropType, Diagnosis, Season};
pub use error::{CropAiError, Result};
