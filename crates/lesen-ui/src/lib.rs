use std::rc::Rc;

use kanal::{AsyncReceiver, AsyncSender};
use lesen_config::Config;
use lesen_types::{AppEvent, UiEvent};
use slint::ComponentHandle;

pub mod events;
mod overlay;
mod state;

use self::events::handle_events;
use self::state::UiState;

slint::include_modules!();

/// Run the windows on the current thread until the main window closes
///
/// Must be called from the main thread. Backend events arrive on
/// `app_to_ui_rx`; selection results and capture requests go out on
/// `ui_to_app_tx`.
pub fn run(
    config: &Config,
    app_to_ui_rx: AsyncReceiver<UiEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let main = MainWindow::new()?;
    let overlay = OverlayWindow::new()?;
    let state = Rc::new(UiState::new());

    main.set_hotkey_label(config.hotkey.combination.clone().into());
    overlay.set_keep_on_top(config.ui.always_on_top);

    overlay::wire(&overlay, state.clone(), ui_to_app_tx.clone());

    // Same path as the global hotkey
    {
        let tx = ui_to_app_tx.clone();
        main.on_start_capture(move || {
            let tx = tx.clone();
            if let Err(e) = slint::spawn_local(async move {
                if let Err(e) = tx.send(AppEvent::HotkeyPressed).await {
                    tracing::error!("[SLINT] Failed to request capture: {}", e);
                }
            }) {
                tracing::error!("[SLINT] Failed to schedule capture request: {}", e);
            }
        });
    }

    // Spawn a task to receive events from the app
    {
        let main_weak = main.as_weak();
        let overlay_weak = overlay.as_weak();
        let state = state.clone();
        let tx = ui_to_app_tx.clone();
        slint::spawn_local(async move {
            while let Ok(event) = app_to_ui_rx.recv().await {
                handle_events(event, &main_weak, &overlay_weak, &state, &tx).await;
            }
            tracing::info!("[SLINT] Backend channel closed");
            slint::quit_event_loop().ok();
        })?;
    }

    main.show()?;
    slint::run_event_loop()?;

    overlay.hide().ok();
    tracing::info!("[SLINT] Event loop finished");
    Ok(())
}
