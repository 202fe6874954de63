use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use lesen_ocr::HotkeyListener;
use lesen_types::{AppEvent, UiEvent};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::event_loop;
use crate::io::hotkey_listener;
use crate::state::AppState;

const HOTKEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<UiEvent>, AsyncReceiver<UiEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // OCR progress bursts
            ui_to_app: kanal::bounded_async(64),  // hotkey and overlay events
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Sender the pipeline uses to reach the UI
    pub fn app_to_ui_tx(&self) -> AsyncSender<UiEvent> {
        self.channels.app_to_ui.0.clone()
    }

    /// The UI's ends of both channels
    pub fn ui_channels(&self) -> (AsyncReceiver<UiEvent>, AsyncSender<AppEvent>) {
        (
            self.channels.app_to_ui.1.clone(),
            self.channels.ui_to_app.0.clone(),
        )
    }

    /// Must be called inside a Tokio runtime context
    pub fn spawn_tasks(
        &self,
        state: Arc<AppState>,
        hotkey: HotkeyListener,
    ) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            state,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Global hotkey
        tasks.spawn(hotkey_listener(
            move || hotkey.poll(),
            HOTKEY_POLL_INTERVAL,
            self.cancel_token.child_token(),
            self.channels.ui_to_app.0.clone(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}
