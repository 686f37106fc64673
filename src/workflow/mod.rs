//! 送信ワークフロー
//!
//! フォーム1つにつき Workflow を1つ持つ。状態遷移:
//! - Idle --submit--> Analyzing --resolve--> Succeeded / Failed
//! - どの状態からも reset で Idle（入力もすべて消える）
//!
//! 同時に走るリクエストは1件まで。完了通知は SubmissionId が
//! 現在の送信と一致したときだけ反映する（reset 後の遅延レスポンスは捨てる）。

mod session;

pub use session::{Completion, Session};

use crate::input::{self, ImageFile, SelectedImage, ValidationError};
use crate::service::{AnalysisFailure, AnalysisRequest};
use crop_ai_common::{CropType, Diagnosis, Season};
use std::fmt;
use std::path::Path;

/// 送信ごとに単調増加するID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionId(u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 送信状態
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Analyzing,
    Succeeded(Diagnosis),
    Failed(String),
}

impl SubmissionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Analyzing => "analyzing",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }
}

/// submit で発行される送信チケット
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: SubmissionId,
    pub request: AnalysisRequest,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    image: Option<SelectedImage>,
    crop: Option<CropType>,
    season: Option<Season>,
    state: SubmissionState,
    /// 直近のローカル検証エラー
    notice: Option<ValidationError>,
    in_flight: Option<SubmissionId>,
    last_id: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn crop_type(&self) -> Option<CropType> {
        self.crop
    }

    pub fn season(&self) -> Option<Season> {
        self.season
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn notice(&self) -> Option<&ValidationError> {
        self.notice.as_ref()
    }

    pub fn in_flight(&self) -> Option<SubmissionId> {
        self.in_flight
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 画像・作物・季節がそろっているか
    pub fn is_complete(&self) -> bool {
        self.image.is_some() && self.crop.is_some() && self.season.is_some()
    }

    /// 画像を選択する
    ///
    /// 失敗しても以前の画像は残す。送信状態には触れない。
    pub fn select_image(&mut self, file: ImageFile) -> Result<(), ValidationError> {
        match input::select_image(file) {
            Ok(image) => {
                self.image = Some(image);
                self.notice = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("画像選択を拒否: {:?}", err);
                self.notice = Some(err.clone());
                Err(err)
            }
        }
    }

    /// パスから画像を選択する（読み込み失敗も検証エラーとして記録）
    pub fn select_image_path(&mut self, path: &Path) -> Result<(), ValidationError> {
        match ImageFile::open(path) {
            Ok(file) => self.select_image(file),
            Err(err) => {
                log::warn!("画像読み込み失敗: {} ({:?})", path.display(), err);
                self.notice = Some(err.clone());
                Err(err)
            }
        }
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.notice = None;
    }

    /// 解析中に変更しても送信済みのリクエストには影響しない
    pub fn set_crop_type(&mut self, crop: CropType) {
        self.crop = Some(crop);
    }

    pub fn set_season(&mut self, season: Season) {
        self.season = Some(season);
    }

    /// 解析を開始する
    ///
    /// - 入力不足: `Err(IncompleteInput)`（状態は変えない）
    /// - 解析中: `Ok(None)`（2件目は出さない）
    /// - それ以外: Analyzing に遷移し、送信チケットを返す
    pub fn submit(&mut self) -> Result<Option<Submission>, ValidationError> {
        if let Some(id) = self.in_flight {
            log::debug!("解析中のため submit を無視 ({})", id);
            return Ok(None);
        }

        let (Some(image), Some(crop), Some(season)) = (&self.image, self.crop, self.season) else {
            self.notice = Some(ValidationError::IncompleteInput);
            return Err(ValidationError::IncompleteInput);
        };

        let request = AnalysisRequest {
            image: image.bytes.clone(),
            mime_type: image.mime_type,
            crop,
            season,
        };

        self.last_id += 1;
        let id = SubmissionId(self.last_id);
        self.in_flight = Some(id);
        self.state = SubmissionState::Analyzing;
        self.notice = None;
        log::debug!("状態遷移: idle -> analyzing ({})", id);

        Ok(Some(Submission { id, request }))
    }

    /// 解析結果を反映する
    ///
    /// 現在の送信IDと一致しない完了は捨てて false を返す
    pub fn resolve(&mut self, id: SubmissionId, outcome: Result<Diagnosis, AnalysisFailure>) -> bool {
        if self.in_flight != Some(id) {
            log::warn!("古いレスポンスを破棄 ({}, 現在: {:?})", id, self.in_flight);
            return false;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(diagnosis) => {
                log::info!(
                    "解析成功 ({}): {} ({:.4})",
                    id,
                    diagnosis.disease_name,
                    diagnosis.confidence
                );
                SubmissionState::Succeeded(diagnosis)
            }
            Err(failure) => {
                log::warn!("解析失敗 ({}): {}", id, failure);
                SubmissionState::Failed(failure.user_message())
            }
        };
        true
    }

    /// すべての入力と結果を消して Idle に戻す
    ///
    /// 解析中のリクエストは無効になる（ID カウンタは戻さない）
    pub fn reset(&mut self) {
        if let Some(id) = self.in_flight {
            log::debug!("reset により {} を無効化", id);
        }
        *self = Self {
            last_id: self.last_id,
            ..Self::default()
        };
    }

    /// エラー表示を閉じる（入力は残すのでそのまま再送できる）
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SubmissionState::Failed(_)) {
            self.state = SubmissionState::Idle;
        }
        self.notice = None;
    }
}
