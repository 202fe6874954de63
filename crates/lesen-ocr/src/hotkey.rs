use anyhow::{Context, Result};
use global_hotkey::{
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
    hotkey::HotKey,
};

/// Owns the global shortcut registration; unregisters on drop
///
/// Create it on the thread that runs the platform event loop.
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    hotkey: HotKey,
}

impl HotkeyManager {
    /// Register a combination such as `CmdOrCtrl+Shift+T`
    pub fn from_combination(combination: &str) -> Result<Self> {
        let hotkey: HotKey = combination
            .parse()
            .with_context(|| format!("Invalid hotkey '{combination}'"))?;
        Self::register(hotkey)
    }

    fn register(hotkey: HotKey) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        manager
            .register(hotkey)
            .context("Failed to register hotkey")?;

        Ok(Self { manager, hotkey })
    }

    /// A handle that can watch for presses from any thread
    pub fn listener(&self) -> HotkeyListener {
        HotkeyListener {
            id: self.hotkey.id(),
        }
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        if let Err(e) = self.manager.unregister(self.hotkey) {
            tracing::warn!("Failed to unregister hotkey: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HotkeyListener {
    id: u32,
}

impl HotkeyListener {
    /// True once per key press of our hotkey (non-blocking)
    ///
    /// Release events and other registrations are drained and ignored.
    pub fn poll(&self) -> bool {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.try_recv() {
            if event.id != self.id {
                tracing::debug!("Ignoring hotkey event for id {}", event.id);
                continue;
            }
            if matches!(event.state, HotKeyState::Pressed) {
                return true;
            }
        }
        false
    }
}
