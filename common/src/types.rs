//! 診断の型定義
//!
//! - CropType / Season: フォームで選択するカテゴリ（送信時の文字列がそのままワイヤ値）
//! - Diagnosis: 解析サービスの成功レスポンス
//! - HealthStatus: /health のレスポンス

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// 作物の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropType {
    Wheat,
    Rice,
    Corn,
    Soybean,
    Cotton,
    Potato,
    Tomato,
    Apple,
    Grape,
    Other,
}

impl CropType {
    /// UI表示順
    pub const ALL: [CropType; 10] = [
        CropType::Wheat,
        CropType::Rice,
        CropType::Corn,
        CropType::Soybean,
        CropType::Cotton,
        CropType::Potato,
        CropType::Tomato,
        CropType::Apple,
        CropType::Grape,
        CropType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Rice => "Rice",
            CropType::Corn => "Corn",
            CropType::Soybean => "Soybean",
            CropType::Cotton => "Cotton",
            CropType::Potato => "Potato",
            CropType::Tomato => "Tomato",
            CropType::Apple => "Apple",
            CropType::Grape => "Grape",
            CropType::Other => "Other",
        }
    }
}

impl FromStr for CropType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CropType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory {
                kind: "crop type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 季節
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Monsoon,
    Autumn,
    Winter,
}

impl Season {
    /// UI表示順
    pub const ALL: [Season; 5] = [
        Season::Spring,
        Season::Summer,
        Season::Monsoon,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Monsoon => "Monsoon",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl FromStr for Season {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Season::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidCategory {
                kind: "season",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 解析結果（サービスから受け取ったまま保持し、マージしない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub disease_name: String,

    /// 0.0〜1.0
    pub confidence: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// 治療・対策（サービスの返却順）。null の要素は読み飛ばす
    #[serde(default, deserialize_with = "treatment_items")]
    pub treatment: Vec<String>,

    /// エコーされた作物
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,

    /// エコーされた季節
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    /// モデルの生クラス名（例: "Tomato___Late_blight"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
}

/// 明示的な null も欠落と同じ扱いにする
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn treatment_items<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

/// サービスのヘルスチェック結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
    pub class_names_count: usize,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.model_loaded
    }
}
