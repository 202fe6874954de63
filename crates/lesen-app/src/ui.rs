use kanal::{AsyncReceiver, AsyncSender};
use lesen_config::Config;
use lesen_types::{AppEvent, UiEvent};

/// Blocks the calling (main) thread until the main window closes
pub fn ui_loop(
    config: &Config,
    app_to_ui_rx: AsyncReceiver<UiEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    lesen_ui::run(config, app_to_ui_rx, ui_to_app_tx)
}
