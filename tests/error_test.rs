//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use crop_ai_rust::error::CropAiError;
use crop_ai_rust::input::ValidationError;
use crop_ai_rust::service::AnalysisFailure;

/// CropAiErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        CropAiError::Config("テスト設定エラー".to_string()),
        CropAiError::Validation(ValidationError::IncompleteInput),
        CropAiError::Analysis(AnalysisFailure::Transport("connection refused".to_string())),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 検証エラーは透過的にそのまま表示される
#[test]
fn test_validation_error_transparent() {
    let err: CropAiError = ValidationError::TooLarge { size: 6 * 1024 * 1024 }.into();
    assert_eq!(
        format!("{}", err),
        "File size too large. Please upload an image under 5MB."
    );
}

/// 解析失敗からの変換
#[test]
fn test_analysis_failure_conversion() {
    let failure = AnalysisFailure::Service {
        status: 503,
        message: Some("model unavailable".to_string()),
    };
    let err: CropAiError = failure.into();

    assert!(matches!(err, CropAiError::Analysis(_)));
    assert!(format!("{}", err).contains("model unavailable"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: CropAiError = io_err.into();

    assert!(matches!(err, CropAiError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: CropAiError = json_err.into();

    assert!(matches!(err, CropAiError::JsonParse(_)));
}

/// common::Errorからの変換（透過的）
#[test]
fn test_common_error_conversion() {
    let common_err = crop_ai_common::Error::Parse("パースエラー".to_string());
    let err: CropAiError = common_err.into();

    assert!(matches!(err, CropAiError::Common(_)));
    assert!(format!("{}", err).contains("パースエラー"));
}
