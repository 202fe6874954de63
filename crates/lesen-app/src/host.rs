use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use kanal::AsyncSender;
use lesen_core::host::{HostWindow, OverlayHost};
use lesen_types::{DisplayInfo, UiEvent};

/// Window requests forwarded to the UI thread
///
/// Slint windows live on the main thread, so the pipeline only ever asks
/// for changes through the app→UI channel.
#[derive(Clone)]
pub struct UiChannelHost {
    tx: AsyncSender<UiEvent>,
}

impl UiChannelHost {
    pub fn new(tx: AsyncSender<UiEvent>) -> Self {
        Self { tx }
    }

    async fn send(&self, event: UiEvent) -> anyhow::Result<()> {
        self.tx
            .send(event)
            .await
            .context("UI channel closed")
    }
}

#[async_trait]
impl HostWindow for UiChannelHost {
    async fn minimize(&self) -> anyhow::Result<()> {
        self.send(UiEvent::MinimizeMain).await
    }

    async fn restore_and_focus(&self) -> anyhow::Result<()> {
        self.send(UiEvent::RestoreMain).await
    }

    fn is_alive(&self) -> bool {
        !self.tx.is_disconnected()
    }
}

#[async_trait]
impl OverlayHost for UiChannelHost {
    async fn open(&self, image_path: &Path, display: DisplayInfo) -> anyhow::Result<()> {
        self.send(UiEvent::ScreenshotReady {
            image_path: image_path.to_path_buf(),
            display,
        })
        .await
    }

    async fn focus(&self) -> anyhow::Result<()> {
        self.send(UiEvent::FocusOverlay).await
    }

    async fn close(&self) -> anyhow::Result<()> {
        self.send(UiEvent::CloseOverlay).await
    }
}
