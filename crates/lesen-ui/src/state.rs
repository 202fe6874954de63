use std::cell::Cell;

use lesen_core::overlay::OverlayState;

/// UI-thread state (separate from the backend's run state)
pub struct UiState {
    pub overlay: Cell<OverlayState>,
    pub overlay_open: Cell<bool>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            overlay: Cell::new(OverlayState::Idle),
            overlay_open: Cell::new(false),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
