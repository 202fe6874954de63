use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use kanal::AsyncSender;
use lesen_config::Config;
use lesen_core::host::{HostWindow, OverlayHost};
use lesen_core::preprocess::{is_blank, normalize_recognized};
use lesen_core::region::map_region;
use lesen_core::state::RunState;
use lesen_ocr::{
    CaptureError, CapturedImage, ModelLocator, OcrPipeline, ProgressReporter, ScreenCapture,
    TesseractEngine, XcapCapture,
};
use lesen_translator::{MyMemoryTranslator, Translator};
use lesen_types::{DisplayInfo, OcrProgress, OverlaySize, RunOutcome, SelectionRegion, UiEvent};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::host::UiChannelHost;

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// What a hotkey press led to
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// The overlay is up and the run waits for a selection
    Started(Uuid),
    /// A run was already waiting for a selection; its overlay was raised
    Refocused,
    /// A run is past selection and cannot be interrupted
    Ignored,
    Failed(RunOutcome),
}

/// The single run the orchestrator owns
#[derive(Debug, Default)]
struct PipelineRun {
    id: Option<Uuid>,
    state: RunState,
    capture: Option<CapturedImage>,
}

impl PipelineRun {
    fn advance(&mut self, next: RunState) {
        if !self.state.can_transition_to(next) {
            tracing::warn!("Unexpected run transition {:?} -> {:?}", self.state, next);
        }
        tracing::debug!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn span(&self) -> tracing::Span {
        let id = self.id.unwrap_or_default();
        tracing::info_span!("run", id = %id)
    }
}

/// Hotkey → capture → select → OCR → translate
///
/// All run state sits behind one lock that is never held across an await
/// on a collaborator, so a hotkey press always sees the current state.
pub struct Pipeline {
    capture: Arc<dyn ScreenCapture>,
    ocr: OcrPipeline,
    translator: Arc<dyn Translator>,
    host: Arc<dyn HostWindow>,
    overlay: Arc<dyn OverlayHost>,
    ui_tx: AsyncSender<UiEvent>,
    settle_delay: Duration,
    run: Mutex<PipelineRun>,
}

impl Pipeline {
    pub fn new(
        capture: Arc<dyn ScreenCapture>,
        ocr: OcrPipeline,
        translator: Arc<dyn Translator>,
        host: Arc<dyn HostWindow>,
        overlay: Arc<dyn OverlayHost>,
        ui_tx: AsyncSender<UiEvent>,
    ) -> Self {
        Self {
            capture,
            ocr,
            translator,
            host,
            overlay,
            ui_tx,
            settle_delay: DEFAULT_SETTLE_DELAY,
            run: Mutex::new(PipelineRun::default()),
        }
    }

    /// Production wiring: xcap, tesseract, MyMemory and the Slint windows
    pub fn from_config(config: &Config, ui_tx: AsyncSender<UiEvent>) -> Self {
        let engine = Arc::new(TesseractEngine::new(config.ocr.tesseract_path.clone()));
        let ocr = OcrPipeline::new(engine, ModelLocator::from_config(&config.ocr));
        let translator = Arc::new(MyMemoryTranslator::from_config(&config.translator));
        let windows = Arc::new(UiChannelHost::new(ui_tx.clone()));

        Self::new(
            Arc::new(XcapCapture),
            ocr,
            translator,
            windows.clone(),
            windows,
            ui_tx,
        )
        .with_settle_delay(config.capture.settle_delay())
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub async fn state(&self) -> RunState {
        self.run.lock().await.state
    }

    /// Handle a hotkey press
    pub async fn activate(&self) -> Activation {
        let span = {
            let mut run = self.run.lock().await;
            if !run.state.accepts_activation() {
                let state = run.state;
                let span = run.span();
                drop(run);
                return self.refocus(state).instrument(span).await;
            }

            run.id = Some(Uuid::new_v4());
            run.capture = None;
            run.advance(RunState::Capturing);
            run.span()
        };

        self.start().instrument(span).await
    }

    async fn refocus(&self, state: RunState) -> Activation {
        if state != RunState::AwaitingSelection {
            tracing::debug!("Run busy ({:?}), ignoring activation", state);
            return Activation::Ignored;
        }

        tracing::debug!("Run already awaiting selection, refocusing overlay");
        if let Err(e) = self.overlay.focus().await {
            tracing::warn!("Failed to refocus overlay: {:#}", e);
        }
        Activation::Refocused
    }

    async fn start(&self) -> Activation {
        tracing::info!("Run started");
        self.notify(UiEvent::RunStarted).await;

        if let Err(e) = self.host.minimize().await {
            tracing::warn!("Failed to minimize host window: {:#}", e);
        }
        tokio::time::sleep(self.settle_delay).await;

        let (captured, display) = match self.capture_screen().await {
            Ok(captured) => captured,
            Err(e) => return Activation::Failed(self.fail(e).await),
        };
        let image_path = captured.path().to_path_buf();

        let id = {
            let mut run = self.run.lock().await;
            run.capture = Some(captured);
            run.advance(RunState::AwaitingSelection);
            run.id.unwrap_or_default()
        };

        if let Err(e) = self.overlay.open(&image_path, display).await {
            let error =
                PipelineError::CaptureUnavailable(format!("Cannot show selection overlay: {e:#}"));
            return Activation::Failed(self.fail(error).await);
        }

        let (width_logical, height_logical, scale_factor) = (
            display.width_logical,
            display.height_logical,
            display.scale_factor,
        );
        tracing::info!(
            "Awaiting selection on {}x{} display (scale {})",
            width_logical,
            height_logical,
            scale_factor
        );
        Activation::Started(id)
    }

    async fn capture_screen(&self) -> Result<(CapturedImage, DisplayInfo), PipelineError> {
        let capture = self.capture.clone();
        let (captured, display) = tokio::task::spawn_blocking(move || {
            let display = capture.display_info()?;
            let captured = capture.capture(&display)?;
            Ok::<_, CaptureError>((captured, display))
        })
        .await
        .map_err(|e| PipelineError::CaptureUnavailable(format!("Capture task failed: {e}")))??;

        let expected = display.physical_size();
        if captured.pixel_size() != expected {
            tracing::warn!(
                "Capture is {:?}, display expects {:?}",
                captured.pixel_size(),
                expected
            );
        }
        tracing::debug!("Captured screen to {}", captured.path().display());
        Ok((captured, display))
    }

    /// The overlay reported a selection; runs the rest of the pipeline
    ///
    /// Returns `None` when the run was not waiting for a selection or the
    /// region mapped to nothing.
    pub async fn on_region_confirmed(
        &self,
        selection: SelectionRegion,
        overlay_size: OverlaySize,
    ) -> Option<RunOutcome> {
        let (span, captured) = {
            let mut run = self.run.lock().await;
            if run.state != RunState::AwaitingSelection {
                tracing::warn!("Selection arrived while {:?}, ignoring", run.state);
                return None;
            }
            run.advance(RunState::Cropping);
            (run.span(), run.capture.take())
        };

        self.process(selection, overlay_size, captured)
            .instrument(span)
            .await
    }

    async fn process(
        &self,
        selection: SelectionRegion,
        overlay_size: OverlaySize,
        captured: Option<CapturedImage>,
    ) -> Option<RunOutcome> {
        self.close_overlay().await;
        self.restore_host().await;

        let Some(captured) = captured else {
            let error = PipelineError::CaptureUnavailable("Screenshot is no longer available".into());
            return Some(self.fail(error).await);
        };

        let Some(source) = map_region(&selection, overlay_size, captured.pixel_size()) else {
            release(captured);
            self.cancel().await;
            return None;
        };
        tracing::debug!(
            "Selection {:?} on {:?} maps to {:?}",
            selection,
            overlay_size,
            source
        );

        let cropped = captured.crop(&source);
        release(captured);

        self.advance(RunState::RecognizingText).await;
        let text = match self.recognize(&cropped).await {
            Ok(text) => text,
            Err(e) => return Some(self.fail(e).await),
        };
        drop(cropped);

        if is_blank(&text) {
            tracing::info!("No text detected");
            return Some(self.complete(RunOutcome::NoText).await);
        }
        tracing::info!("Recognized {} chars", text.chars().count());

        self.advance(RunState::Translating).await;
        self.notify(UiEvent::TranslationStarted).await;
        match self.translator.translate(&text).await {
            Ok(result) => {
                if result.was_truncated {
                    tracing::info!("Source text was truncated before translation");
                }
                let outcome = RunOutcome::Ok {
                    text,
                    translated_text: result.translated_text,
                    was_truncated: result.was_truncated,
                };
                Some(self.complete(outcome).await)
            }
            Err(e) => Some(self.fail(e.into()).await),
        }
    }

    async fn recognize(&self, image: &RgbaImage) -> Result<String, PipelineError> {
        let (tx, rx) = kanal::bounded_async::<OcrProgress>(64);
        let ui_tx = self.ui_tx.clone();
        let forwarder = tokio::spawn(
            async move {
                while let Ok(update) = rx.recv().await {
                    tracing::debug!("OCR {} {:.2}", update.stage.label(), update.fraction);
                    if ui_tx.send(UiEvent::OcrProgress(update)).await.is_err() {
                        break;
                    }
                }
            }
            .in_current_span(),
        );

        let mut reporter = ProgressReporter::new(tx);
        let result = self.ocr.recognize(image, &mut reporter).await;
        // Closing the stream lets the forwarder drain and exit before the outcome goes out
        drop(reporter);
        if let Err(e) = forwarder.await {
            tracing::warn!("Progress forwarder failed: {}", e);
        }

        Ok(normalize_recognized(&result?))
    }

    /// The overlay was dismissed without a usable selection
    pub async fn on_selection_cancelled(&self) {
        let (span, leftover) = {
            let mut run = self.run.lock().await;
            if run.state != RunState::AwaitingSelection {
                tracing::debug!("Cancellation while {:?}, ignoring", run.state);
                return;
            }
            run.advance(RunState::Cancelled);
            (run.span(), run.capture.take())
        };

        async {
            tracing::info!("Run ended: {}", PipelineError::SelectionCancelled);
            if let Some(captured) = leftover {
                release(captured);
            }
            self.close_overlay().await;
            self.restore_host().await;
            self.notify(UiEvent::RunCancelled).await;
        }
        .instrument(span)
        .await
    }

    /// Drop whatever the current run still holds
    pub async fn shutdown(&self) {
        let leftover = self.run.lock().await.capture.take();
        if let Some(captured) = leftover {
            tracing::debug!("Releasing screenshot of unfinished run");
            release(captured);
        }
    }

    async fn cancel(&self) {
        self.advance(RunState::Cancelled).await;
        tracing::info!("Run ended: {}", PipelineError::SelectionCancelled);
        self.notify(UiEvent::RunCancelled).await;
    }

    async fn complete(&self, outcome: RunOutcome) -> RunOutcome {
        self.advance(RunState::Done).await;
        tracing::info!("Run finished");
        self.notify(UiEvent::Outcome(outcome.clone())).await;
        outcome
    }

    async fn fail(&self, error: PipelineError) -> RunOutcome {
        let stage = error.stage();
        tracing::error!("Run failed during {}: {}", stage, error);

        let leftover = {
            let mut run = self.run.lock().await;
            run.advance(RunState::Errored(stage));
            run.capture.take()
        };
        if let Some(captured) = leftover {
            release(captured);
        }

        self.close_overlay().await;
        self.restore_host().await;

        let outcome = RunOutcome::Error {
            stage,
            message: error.to_string(),
        };
        self.notify(UiEvent::Outcome(outcome.clone())).await;
        outcome
    }

    async fn advance(&self, next: RunState) {
        self.run.lock().await.advance(next);
    }

    async fn close_overlay(&self) {
        if let Err(e) = self.overlay.close().await {
            tracing::warn!("Failed to close overlay: {:#}", e);
        }
    }

    async fn restore_host(&self) {
        if !self.host.is_alive() {
            tracing::debug!("Host window is gone, nothing to restore");
            return;
        }
        if let Err(e) = self.host.restore_and_focus().await {
            tracing::warn!("Failed to restore host window: {:#}", e);
        }
    }

    async fn notify(&self, event: UiEvent) {
        if let Err(e) = self.ui_tx.send(event).await {
            tracing::debug!("UI channel closed, dropping event: {}", e);
        }
    }
}

fn release(captured: CapturedImage) {
    let path = captured.path().to_path_buf();
    if let Err(e) = captured.discard() {
        tracing::warn!("Failed to remove {}: {}", path.display(), e);
    }
}
