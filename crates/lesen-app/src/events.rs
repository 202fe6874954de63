use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lesen_types::{AppEvent, UiEvent};
use tokio_util::sync::CancellationToken;

use crate::pipeline::Activation;
use crate::state::AppState;

/// App's main loop
///
/// Pipeline work runs in its own task so a hotkey press is seen while a run
/// is in flight and can be refocused or ignored instead of queued.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<UiEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!(
        "[EVENT_LOOP] Ready: OCR '{}', translating {}",
        state.config.ocr.language,
        state.config.translator.language_pair()
    );
    app_to_ui_tx.send(UiEvent::BackendReady).await?;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        tracing::debug!("[EVENT_LOOP] Event received: {:?}", event);
        if !handle_events(&state, event) {
            break;
        }
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

/// Returns false when the loop should stop
fn handle_events(state: &Arc<AppState>, event: AppEvent) -> bool {
    let pipeline = state.pipeline.clone();
    match event {
        AppEvent::HotkeyPressed => {
            tokio::spawn(async move {
                match pipeline.activate().await {
                    Activation::Started(id) => tracing::debug!("Run {} awaiting selection", id),
                    Activation::Refocused => tracing::debug!("Existing overlay refocused"),
                    Activation::Ignored => tracing::debug!("Activation ignored, run in flight"),
                    Activation::Failed(outcome) => tracing::debug!("Activation failed: {:?}", outcome),
                }
            });
        }
        AppEvent::RegionConfirmed {
            selection,
            overlay_size,
        } => {
            tokio::spawn(async move {
                if let Some(outcome) = pipeline.on_region_confirmed(selection, overlay_size).await {
                    tracing::debug!("Run outcome: {:?}", outcome);
                }
            });
        }
        AppEvent::SelectionCancelled => {
            tokio::spawn(async move {
                pipeline.on_selection_cancelled().await;
            });
        }
        AppEvent::Shutdown => {
            tracing::info!("[EVENT_LOOP] Shutdown requested");
            return false;
        }
    }
    true
}
