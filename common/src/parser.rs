//! 解析サービスのレスポンスパーサー
//!
//! 成功時は Diagnosis、失敗時は `error` フィールドのメッセージを取り出す

use crate::error::{Error, Result};
use crate::types::{Diagnosis, HealthStatus};

/// 成功レスポンスをパース
///
/// `disease_name` と `confidence`（0〜1の有限値）が必須。
/// `description` / `treatment` は欠けていても空として扱う。
///
/// # Examples
/// ```
/// use crop_ai_common::parse_diagnosis;
///
/// let body = r#"{"disease_name": "Blight", "confidence": 0.5}"#;
/// let diagnosis = parse_diagnosis(body).unwrap();
/// assert_eq!(diagnosis.disease_name, "Blight");
/// assert!(diagnosis.treatment.is_empty());
/// ```
pub fn parse_diagnosis(body: &str) -> Result<Diagnosis> {
    let diagnosis: Diagnosis = serde_json::from_str(body.trim())?;

    if diagnosis.disease_name.trim().is_empty() {
        return Err(Error::Parse("disease_name is empty".into()));
    }

    let c = diagnosis.confidence;
    if !c.is_finite() || !(0.0..=1.0).contains(&c) {
        return Err(Error::Parse(format!("confidence out of range: {}", c)));
    }

    Ok(diagnosis)
}

/// エラーレスポンスから `error` メッセージを取り出す
///
/// JSONでない・フィールドがない・空文字の場合は None
pub fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_string)
}

/// /health レスポンスをパース
pub fn parse_health(body: &str) -> Result<HealthStatus> {
    Ok(serde_json::from_str(body.trim())?)
}
