use std::time::Duration;

use kanal::AsyncSender;
use lesen_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Turn hotkey presses into [`AppEvent::HotkeyPressed`]
///
/// `poll` is non-blocking and returns true once per press. It runs on a
/// blocking thread until `cancel` fires or the app side of the channel closes.
pub async fn hotkey_listener<F>(
    mut poll: F,
    poll_interval: Duration,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()>
where
    F: FnMut() -> bool + Send + 'static,
{
    let runtime = tokio::runtime::Handle::current();

    tokio::task::spawn_blocking(move || {
        tracing::info!("Hotkey listener started");

        while !cancel.is_cancelled() {
            if poll() {
                tracing::info!("Hotkey pressed");
                if let Err(e) = runtime.block_on(event_tx.send(AppEvent::HotkeyPressed)) {
                    tracing::error!("Failed to send hotkey event to app: {}", e);
                    break;
                }
            }

            // Sleep briefly to avoid busy loop
            std::thread::sleep(poll_interval);
        }

        tracing::info!("Hotkey listener stopping");
    })
    .await?;

    Ok(())
}
