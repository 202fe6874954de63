use std::rc::Rc;

use kanal::AsyncSender;
use lesen_core::overlay::{OverlayInput, OverlayState, OverlayView, reduce, view};
use lesen_types::{AppEvent, OverlayPoint, OverlaySize};
use slint::ComponentHandle;

use crate::OverlayWindow;
use crate::state::UiState;

/// Route pointer and key callbacks through the selection reducer
pub fn wire(overlay: &OverlayWindow, state: Rc<UiState>, tx: AsyncSender<AppEvent>) {
    let pointer = |make: fn(OverlayPoint) -> OverlayInput| {
        let weak = overlay.as_weak();
        let state = state.clone();
        let tx = tx.clone();
        move |x: f32, y: f32| {
            if let Some(overlay) = weak.upgrade() {
                let point = OverlayPoint::new(x as f64, y as f64);
                apply(&overlay, &state, &tx, make(point));
            }
        }
    };

    overlay.on_pointer_down(pointer(OverlayInput::PointerDown));
    overlay.on_pointer_moved(pointer(OverlayInput::PointerMove));
    overlay.on_pointer_up(pointer(OverlayInput::PointerUp));

    let weak = overlay.as_weak();
    overlay.on_escape_pressed(move || {
        if let Some(overlay) = weak.upgrade() {
            apply(&overlay, &state, &tx, OverlayInput::Escape);
        }
    });
}

/// Show a fresh screenshot and arm the selection
pub fn arm(overlay: &OverlayWindow, state: &UiState) {
    let armed = reduce(OverlayState::Idle, OverlayInput::ImageLoaded);
    state.overlay.set(armed);
    state.overlay_open.set(true);
    render(overlay, &view(&armed));
}

/// Hide the surface and forget any selection
pub fn dismiss(overlay: &OverlayWindow, state: &UiState) {
    state.overlay.set(OverlayState::Idle);
    state.overlay_open.set(false);
    render(overlay, &OverlayView::default());
    overlay.window().set_fullscreen(false);
    if let Err(e) = overlay.hide() {
        tracing::warn!("[SLINT] Failed to hide overlay: {}", e);
    }
    overlay.set_screenshot(slint::Image::default());
}

fn apply(
    overlay: &OverlayWindow,
    state: &UiState,
    tx: &AsyncSender<AppEvent>,
    input: OverlayInput,
) {
    let previous = state.overlay.get();
    let next = reduce(previous, input);
    if next == previous {
        return;
    }
    state.overlay.set(next);
    render(overlay, &view(&next));

    let event = match next {
        OverlayState::Confirmed(selection) => AppEvent::RegionConfirmed {
            selection,
            overlay_size: OverlaySize {
                width: overlay.get_canvas_width() as f64,
                height: overlay.get_canvas_height() as f64,
            },
        },
        OverlayState::Cancelled => AppEvent::SelectionCancelled,
        _ => return,
    };

    tracing::debug!("[SLINT] Overlay finished: {:?}", next);
    dismiss(overlay, state);

    let tx = tx.clone();
    if let Err(e) = slint::spawn_local(async move {
        if let Err(e) = tx.send(event).await {
            tracing::error!("[SLINT] Failed to send selection to app: {}", e);
        }
    }) {
        tracing::error!("[SLINT] Failed to schedule selection send: {}", e);
    }
}

fn render(overlay: &OverlayWindow, view: &OverlayView) {
    overlay.set_washed(view.wash);
    match view.preview {
        Some(region) => {
            overlay.set_sel_x(region.x as f32);
            overlay.set_sel_y(region.y as f32);
            overlay.set_sel_width(region.width as f32);
            overlay.set_sel_height(region.height as f32);
            overlay.set_has_selection(true);
        }
        None => overlay.set_has_selection(false),
    }
}
