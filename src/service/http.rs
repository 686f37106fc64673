use super::{AnalysisFailure, AnalysisRequest, AnalysisService};
use crate::config::validate_endpoint;
use crate::error::Result;
use async_trait::async_trait;
use crop_ai_common::{extract_error_message, parse_diagnosis, parse_health, Diagnosis, HealthStatus};
use reqwest::multipart::{Form, Part};

/// multipart の image パートに付けるファイル名（元のファイル名は送らない）
pub const IMAGE_FILE_NAME: &str = "crop_image.jpg";

/// HTTP経由の解析サービス
///
/// クライアント側のタイムアウトは設けない
pub struct HttpAnalysisService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisService {
    pub fn new(endpoint: &str) -> Result<Self> {
        validate_endpoint(endpoint)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("crop-ai/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.health_url()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisFailure::Service {
                status: status.as_u16(),
                message: extract_error_message(&body),
            }
            .into());
        }

        Ok(parse_health(&body)?)
    }

    fn build_form(request: AnalysisRequest) -> std::result::Result<Form, AnalysisFailure> {
        let image = Part::bytes(request.image)
            .file_name(IMAGE_FILE_NAME)
            .mime_str(request.mime_type)
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        Ok(Form::new()
            .part("image", image)
            .text("crop", request.crop.to_string())
            .text("season", request.season.to_string()))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze(&self, request: AnalysisRequest) -> std::result::Result<Diagnosis, AnalysisFailure> {
        let url = self.analyze_url();
        log::info!(
            "解析リクエスト送信: {} (crop={}, season={}, {} bytes)",
            url,
            request.crop,
            request.season,
            request.image.len()
        );

        let form = Self::build_form(request)?;
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        log::debug!("解析レスポンス: status={} ({} chars)", status, body.len());
        interpret_response(status, &body)
    }
}

/// ステータスと本文から結果を判定する
pub fn interpret_response(status: u16, body: &str) -> std::result::Result<Diagnosis, AnalysisFailure> {
    if !(200..300).contains(&status) {
        return Err(AnalysisFailure::Service {
            status,
            message: extract_error_message(body),
        });
    }

    parse_diagnosis(body).map_err(|e| AnalysisFailure::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_success() {
        let body = r#"{"disease_name": "Blight", "confidence": 0.8734, "description": "...", "treatment": ["A", "B"]}"#;
        let diagnosis = interpret_response(200, body).unwrap();
        assert_eq!(diagnosis.disease_name, "Blight");
        assert_eq!(diagnosis.treatment, vec!["A", "B"]);
    }

    #[test]
    fn test_interpret_success_with_null_fields() {
        let body = r#"{"disease_name":"Blight","confidence":0.5,"description":null,"treatment":null}"#;
        let diagnosis = interpret_response(200, body).unwrap();
        assert_eq!(diagnosis.disease_name, "Blight");
        assert!(diagnosis.description.is_empty());
        assert!(diagnosis.treatment.is_empty());
    }

    #[test]
    fn test_interpret_service_error_with_message() {
        let err = interpret_response(503, r#"{"error": "model unavailable"}"#).unwrap_err();
        assert_eq!(
            err,
            AnalysisFailure::Service {
                status: 503,
                message: Some("model unavailable".into())
            }
        );
        assert_eq!(err.user_message(), "model unavailable");
    }

    #[test]
    fn test_interpret_service_error_without_message() {
        let err = interpret_response(500, "{}").unwrap_err();
        assert_eq!(err.user_message(), "Failed to analyze image");

        let err = interpret_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AnalysisFailure::Service { status: 502, message: None }));
    }

    #[test]
    fn test_interpret_malformed_success() {
        let err = interpret_response(200, r#"{"confidence": 0.3}"#).unwrap_err();
        assert!(matches!(err, AnalysisFailure::Malformed(_)));

        let err = interpret_response(200, "").unwrap_err();
        assert!(matches!(err, AnalysisFailure::Malformed(_)));
    }

    #[test]
    fn test_urls() {
        let service = HttpAnalysisService::new("http://localhost:5000/").unwrap();
        assert_eq!(service.analyze_url(), "http://localhost:5000/analyze");
        assert_eq!(service.health_url(), "http://localhost:5000/health");
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        assert!(HttpAnalysisService::new("ftp://example.com").is_err());
    }
}
