//! Workflow の非同期ドライバ
//!
//! 解析リクエストを tokio タスクで実行し、完了をチャネル経由で
//! Workflow::resolve に戻す。状態を触るのは常にこの Session だけ。

use super::{Submission, SubmissionId, Workflow};
use crate::input::{ImageFile, ValidationError};
use crate::service::{AnalysisFailure, AnalysisService};
use crop_ai_common::{CropType, Diagnosis, Season};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// 解析タスクからの完了通知
#[derive(Debug)]
pub struct Completion {
    pub id: SubmissionId,
    pub outcome: Result<Diagnosis, AnalysisFailure>,
}

pub struct Session<S> {
    workflow: Workflow,
    service: Arc<S>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    /// 実行中の解析タスク（reset で中断する）
    running: Option<AbortHandle>,
}

impl<S: AnalysisService + 'static> Session<S> {
    pub fn new(service: Arc<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            workflow: Workflow::new(),
            service,
            tx,
            rx,
            running: None,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn select_image(&mut self, file: ImageFile) -> Result<(), ValidationError> {
        self.workflow.select_image(file)
    }

    pub fn select_image_path(&mut self, path: &Path) -> Result<(), ValidationError> {
        self.workflow.select_image_path(path)
    }

    pub fn clear_image(&mut self) {
        self.workflow.clear_image();
    }

    pub fn set_crop_type(&mut self, crop: CropType) {
        self.workflow.set_crop_type(crop);
    }

    pub fn set_season(&mut self, season: Season) {
        self.workflow.set_season(season);
    }

    pub fn dismiss_error(&mut self) {
        self.workflow.dismiss_error();
    }

    pub fn reset(&mut self) {
        if let Some(task) = self.running.take() {
            task.abort();
        }
        self.workflow.reset();
    }

    /// 解析を開始する。リクエストを出したら true、解析中で無視したら false
    pub fn submit(&mut self) -> Result<bool, ValidationError> {
        let Some(Submission { id, request }) = self.workflow.submit()? else {
            return Ok(false);
        };

        let service = Arc::clone(&self.service);
        let task = tokio::spawn(async move { service.analyze(request).await });
        self.running = Some(task.abort_handle());

        // タスクが panic・中断しても必ず完了通知を出す
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) if e.is_cancelled() => {
                    log::debug!("{} を中断", id);
                    Err(AnalysisFailure::Transport("analysis cancelled".into()))
                }
                Err(e) => {
                    log::error!("解析タスクが異常終了 ({}): {}", id, e);
                    Err(AnalysisFailure::Transport(format!("analysis task failed: {}", e)))
                }
            };
            // Session が破棄済みなら結果は不要
            let _ = tx.send(Completion { id, outcome });
        });

        Ok(true)
    }

    /// 完了通知を1件待って反映する
    ///
    /// 反映されたら Some(true)、古い通知として捨てたら Some(false)
    pub async fn next_completion(&mut self) -> Option<bool> {
        let completion = self.rx.recv().await?;
        let applied = self.workflow.resolve(completion.id, completion.outcome);
        if applied {
            self.running = None;
        }
        Some(applied)
    }

    /// 解析中のリクエストが終わるまで完了通知を処理する
    pub async fn settle(&mut self) {
        while self.workflow.is_analyzing() {
            if self.next_completion().await.is_none() {
                break;
            }
        }
    }
}
