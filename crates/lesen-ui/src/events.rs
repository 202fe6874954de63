use std::path::Path;

use kanal::AsyncSender;
use lesen_types::{AppEvent, DisplayInfo, OcrProgress, RunOutcome, UiEvent};
use slint::{ComponentHandle, Weak};

use crate::state::UiState;
use crate::{MainWindow, OverlayWindow, overlay};

/// What the main window shows once a run has finished
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeText {
    pub status: String,
    pub source: String,
    pub translated: String,
    pub truncated: bool,
    pub error: String,
}

impl From<&RunOutcome> for OutcomeText {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Ok {
                text,
                translated_text,
                was_truncated,
            } => OutcomeText {
                status: "Done".to_string(),
                source: text.clone(),
                translated: translated_text.clone(),
                truncated: *was_truncated,
                error: String::new(),
            },
            RunOutcome::NoText => OutcomeText {
                status: "No text detected".to_string(),
                ..Default::default()
            },
            RunOutcome::Error { stage, message } => OutcomeText {
                status: format!("Failed during {stage}"),
                error: message.clone(),
                ..Default::default()
            },
        }
    }
}

pub async fn handle_events(
    event: UiEvent,
    main_weak: &Weak<MainWindow>,
    overlay_weak: &Weak<OverlayWindow>,
    state: &UiState,
    ui_to_app_tx: &AsyncSender<AppEvent>,
) {
    match event {
        UiEvent::BackendReady => {
            if let Some(w) = main_weak.upgrade() {
                tracing::debug!("[SLINT] Backend ready");
                w.set_ready(true);
                w.set_status("Ready".into());
            }
        }
        UiEvent::ScreenshotReady {
            image_path,
            display,
        } => {
            if let Some(o) = overlay_weak.upgrade()
                && let Err(e) = open_overlay(&o, state, &image_path, display)
            {
                tracing::error!("[SLINT] Failed to open overlay: {}", e);
                overlay::dismiss(&o, state);
                // The backend is waiting on a selection that will never come
                if let Err(e) = ui_to_app_tx.send(AppEvent::SelectionCancelled).await {
                    tracing::error!("[SLINT] Failed to notify app: {}", e);
                }
            }
        }
        UiEvent::FocusOverlay => {
            if let Some(o) = overlay_weak.upgrade()
                && state.overlay_open.get()
            {
                tracing::debug!("[SLINT] Refocusing overlay");
                o.show().ok();
                o.invoke_focus_surface();
            }
        }
        UiEvent::CloseOverlay => {
            if let Some(o) = overlay_weak.upgrade()
                && state.overlay_open.get()
            {
                overlay::dismiss(&o, state);
            }
        }
        UiEvent::MinimizeMain => {
            if let Some(w) = main_weak.upgrade() {
                w.window().set_minimized(true);
            }
        }
        UiEvent::RestoreMain => {
            if let Some(w) = main_weak.upgrade() {
                w.window().set_minimized(false);
                w.show().ok();
            }
        }
        UiEvent::RunStarted => {
            if let Some(w) = main_weak.upgrade() {
                w.set_busy(false);
                w.set_progress(0.0);
                w.set_stage_label("".into());
                w.set_source_text("".into());
                w.set_translated_text("".into());
                w.set_truncated(false);
                w.set_error_text("".into());
                w.set_status("Select a region".into());
            }
        }
        UiEvent::OcrProgress(OcrProgress { stage, fraction }) => {
            if let Some(w) = main_weak.upgrade() {
                w.set_busy(true);
                w.set_status("Reading text".into());
                w.set_stage_label(stage.label().into());
                w.set_progress(fraction);
            }
        }
        UiEvent::TranslationStarted => {
            if let Some(w) = main_weak.upgrade() {
                w.set_busy(true);
                w.set_status("Translating".into());
                w.set_stage_label("".into());
            }
        }
        UiEvent::RunCancelled => {
            if let Some(w) = main_weak.upgrade() {
                w.set_busy(false);
                w.set_progress(0.0);
                w.set_stage_label("".into());
                w.set_status("Ready".into());
            }
        }
        UiEvent::Outcome(outcome) => {
            if let Some(w) = main_weak.upgrade() {
                tracing::debug!("[SLINT] Outcome: {:?}", outcome);
                let text = OutcomeText::from(&outcome);
                w.set_busy(false);
                w.set_status(text.status.into());
                w.set_source_text(text.source.into());
                w.set_translated_text(text.translated.into());
                w.set_truncated(text.truncated);
                w.set_error_text(text.error.into());
            }
        }
    }
}

fn open_overlay(
    overlay: &OverlayWindow,
    state: &UiState,
    image_path: &Path,
    display: DisplayInfo,
) -> anyhow::Result<()> {
    let image = slint::Image::load_from_path(image_path)
        .map_err(|_| anyhow::anyhow!("cannot load {}", image_path.display()))?;
    let (width_logical, height_logical, scale_factor) = (
        display.width_logical,
        display.height_logical,
        display.scale_factor,
    );
    tracing::debug!(
        "[SLINT] Screenshot {}x{} for display {}x{} @{}",
        image.size().width,
        image.size().height,
        width_logical,
        height_logical,
        scale_factor
    );

    overlay.set_screenshot(image);
    overlay::arm(overlay, state);

    let window = overlay.window();
    window.set_position(slint::LogicalPosition::new(0.0, 0.0));
    window.set_size(slint::LogicalSize::new(
        display.width_logical as f32,
        display.height_logical as f32,
    ));
    overlay.show()?;
    window.set_fullscreen(true);
    overlay.invoke_focus_surface();
    Ok(())
}
