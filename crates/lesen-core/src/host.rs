use std::path::Path;

use async_trait::async_trait;
use lesen_types::DisplayInfo;

/// The application's primary window, as seen by the pipeline
#[async_trait]
pub trait HostWindow: Send + Sync {
    async fn minimize(&self) -> anyhow::Result<()>;

    async fn restore_and_focus(&self) -> anyhow::Result<()>;

    fn is_alive(&self) -> bool;
}

/// Full-screen selection surface
///
/// `open` shows the screenshot at `image_path` frameless, transparent,
/// always-on-top and sized to `display`. The surface reports back through
/// the app event channel, never through this trait.
#[async_trait]
pub trait OverlayHost: Send + Sync {
    async fn open(&self, image_path: &Path, display: DisplayInfo) -> anyhow::Result<()>;

    async fn focus(&self) -> anyhow::Result<()>;

    async fn close(&self) -> anyhow::Result<()>;
}
