use kanal::AsyncSender;
use lesen_types::{OcrProgress, OcrStage};

/// Monotonic OCR progress stream
///
/// Stages only move forward and fractions never drop within a stage;
/// stale updates are dropped rather than sent. A closed receiver is not an
/// error: recognition carries on without a listener.
pub struct ProgressReporter {
    tx: Option<AsyncSender<OcrProgress>>,
    last: Option<OcrProgress>,
}

impl ProgressReporter {
    pub fn new(tx: AsyncSender<OcrProgress>) -> Self {
        Self {
            tx: Some(tx),
            last: None,
        }
    }

    /// Reporter that only tracks state
    pub fn silent() -> Self {
        Self { tx: None, last: None }
    }

    pub async fn report(&mut self, stage: OcrStage, fraction: f32) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if let Some(last) = self.last {
            if stage < last.stage {
                return;
            }
            if stage == last.stage && fraction <= last.fraction {
                return;
            }
        }

        let update = OcrProgress { stage, fraction };
        self.last = Some(update);

        if let Some(tx) = &self.tx
            && tx.send(update).await.is_err()
        {
            tracing::debug!("Progress receiver closed, continuing without it");
            self.tx = None;
        }
    }

    /// Final update; always `done` at 1.0
    pub async fn finish(&mut self) {
        self.report(OcrStage::Done, 1.0).await;
    }

    pub fn last(&self) -> Option<OcrProgress> {
        self.last
    }
}
