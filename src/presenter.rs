//! 結果表示
//!
//! Workflow の状態から画面モデル（Screen）を作る純粋関数と、
//! 端末向けのテキストレンダラ

use crate::workflow::{SubmissionState, Workflow};
use crop_ai_common::Diagnosis;
use serde::Serialize;
use std::fmt::Write as _;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const PLACEHOLDER_PROMPT: &str = "Upload an image of your crop, select the crop type and season for AI-powered disease detection and treatment recommendations.";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_TREATMENT: &str = "No treatment recommendations provided.";
pub const DISCLAIMER: &str = "This analysis is provided for informational purposes only. For accurate diagnosis and treatment recommendations, consult with agricultural experts.";

/// 閉じられるエラー表示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub message: String,
    pub dismissible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisView {
    pub disease_name: String,
    /// "87.34%"
    pub confidence: String,
    pub crop_type: String,
    pub season: String,
    pub description: String,
    /// サービスの返却順のまま
    pub treatments: Vec<String>,
}

/// 結果パネル（同時に1つだけ）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum Panel {
    Placeholder {
        prompt: &'static str,
    },
    Ready {
        file_name: String,
        #[serde(skip_serializing)]
        preview: String,
        width: u32,
        height: u32,
        crop: Option<String>,
        season: Option<String>,
        can_submit: bool,
    },
    Analyzing,
    Diagnosis(DiagnosisView),
    Failed(Notice),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    /// 画像選択・入力不足などのローカルエラー
    pub notice: Option<Notice>,
    pub panel: Panel,
}

pub fn present(workflow: &Workflow) -> Screen {
    let notice = workflow.notice().map(|err| Notice {
        message: err.to_string(),
        dismissible: true,
    });

    let panel = match workflow.state() {
        SubmissionState::Analyzing => Panel::Analyzing,
        SubmissionState::Succeeded(diagnosis) => Panel::Diagnosis(diagnosis_view(diagnosis)),
        SubmissionState::Failed(message) => Panel::Failed(Notice {
            message: message.clone(),
            dismissible: true,
        }),
        SubmissionState::Idle => match workflow.image() {
            Some(image) => Panel::Ready {
                file_name: image.file_name.clone(),
                preview: image.preview.clone(),
                width: image.width,
                height: image.height,
                crop: workflow.crop_type().map(|c| c.to_string()),
                season: workflow.season().map(|s| s.to_string()),
                can_submit: workflow.is_complete(),
            },
            None => Panel::Placeholder {
                prompt: PLACEHOLDER_PROMPT,
            },
        },
    };

    Screen { notice, panel }
}

pub fn diagnosis_view(diagnosis: &Diagnosis) -> DiagnosisView {
    DiagnosisView {
        disease_name: diagnosis.disease_name.clone(),
        confidence: format_confidence(diagnosis.confidence),
        crop_type: label_or_fallback(diagnosis.crop_type.as_deref()),
        season: label_or_fallback(diagnosis.season.as_deref()),
        description: if diagnosis.description.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            diagnosis.description.clone()
        },
        treatments: diagnosis.treatment.clone(),
    }
}

/// 0.8734 -> "87.34%"
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn label_or_fallback(label: Option<&str>) -> String {
    match label {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// 端末表示用
pub fn render_text(screen: &Screen) -> String {
    let mut out = String::new();

    if let Some(notice) = &screen.notice {
        let _ = writeln!(out, "⚠ {}", notice.message);
        out.push('\n');
    }

    match &screen.panel {
        Panel::Placeholder { prompt } => {
            let _ = writeln!(out, "{}", prompt);
        }
        Panel::Ready {
            file_name,
            width,
            height,
            crop,
            season,
            can_submit,
            ..
        } => {
            let _ = writeln!(out, "Image:     {} ({}x{})", file_name, width, height);
            let _ = writeln!(out, "Crop type: {}", crop.as_deref().unwrap_or("-"));
            let _ = writeln!(out, "Season:    {}", season.as_deref().unwrap_or("-"));
            if *can_submit {
                let _ = writeln!(out, "Ready to analyze.");
            }
        }
        Panel::Analyzing => {
            let _ = writeln!(out, "Analyzing your crop...");
        }
        Panel::Diagnosis(view) => {
            let _ = writeln!(out, "Diagnosis: {} ({} confidence)", view.disease_name, view.confidence);
            let _ = writeln!(out, "Crop type: {}", view.crop_type);
            let _ = writeln!(out, "Season:    {}", view.season);
            out.push('\n');
            let _ = writeln!(out, "{}", view.description);
            out.push('\n');
            let _ = writeln!(out, "Treatment:");
            if view.treatments.is_empty() {
                let _ = writeln!(out, "  {}", NO_TREATMENT);
            }
            for (i, item) in view.treatments.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, item);
            }
            out.push('\n');
            let _ = writeln!(out, "{}", DISCLAIMER);
        }
        Panel::Failed(notice) => {
            let _ = writeln!(out, "✖ {}", notice.message);
        }
    }

    out
}
