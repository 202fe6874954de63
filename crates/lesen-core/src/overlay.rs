//! Selection overlay as a pure state machine
//!
//! The UI feeds pointer and key input through [`reduce`] and renders whatever
//! [`view`] returns. Nothing here touches a window.

use lesen_types::{OverlayPoint, SelectionRegion};

use crate::region::is_below_threshold;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OverlayState {
    #[default]
    Idle,
    /// Screenshot is on screen, waiting for a drag
    Armed,
    Dragging {
        anchor: OverlayPoint,
        current: OverlayPoint,
    },
    Confirmed(SelectionRegion),
    Cancelled,
}

impl OverlayState {
    /// Confirmed and Cancelled end the overlay's life
    pub fn is_terminal(&self) -> bool {
        matches!(self, OverlayState::Confirmed(_) | OverlayState::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayInput {
    ImageLoaded,
    PointerDown(OverlayPoint),
    PointerMove(OverlayPoint),
    PointerUp(OverlayPoint),
    Escape,
}

pub fn reduce(state: OverlayState, input: OverlayInput) -> OverlayState {
    use OverlayInput::*;
    use OverlayState::*;

    match (state, input) {
        (Idle, ImageLoaded) => Armed,
        (Armed, PointerDown(point)) => Dragging {
            anchor: point,
            current: point,
        },
        (Dragging { anchor, .. }, PointerMove(point)) => Dragging {
            anchor,
            current: point,
        },
        (Dragging { anchor, .. }, PointerUp(point)) => {
            let region = SelectionRegion::from_drag(anchor, point);
            if is_below_threshold(&region) {
                Cancelled
            } else {
                Confirmed(region)
            }
        }
        (Armed | Dragging { .. }, Escape) => Cancelled,
        (state, _) => state,
    }
}

/// What the overlay surface should draw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayView {
    /// Dark wash over the whole screenshot
    pub wash: bool,
    /// Live selection rectangle
    pub preview: Option<SelectionRegion>,
}

pub fn view(state: &OverlayState) -> OverlayView {
    match state {
        OverlayState::Idle | OverlayState::Cancelled => OverlayView::default(),
        OverlayState::Armed => OverlayView {
            wash: true,
            preview: None,
        },
        OverlayState::Dragging { anchor, current } => OverlayView {
            wash: true,
            preview: Some(SelectionRegion::from_drag(*anchor, *current)),
        },
        OverlayState::Confirmed(region) => OverlayView {
            wash: true,
            preview: Some(*region),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> OverlayPoint {
        OverlayPoint::new(x, y)
    }

    fn run(inputs: &[OverlayInput]) -> OverlayState {
        inputs
            .iter()
            .fold(OverlayState::Idle, |state, input| reduce(state, *input))
    }

    #[test]
    fn test_pointer_ignored_until_image_loaded() {
        let state = run(&[OverlayInput::PointerDown(p(1.0, 1.0))]);
        assert_eq!(state, OverlayState::Idle);
    }

    #[test]
    fn test_drag_confirms_normalized_region() {
        let state = run(&[
            OverlayInput::ImageLoaded,
            OverlayInput::PointerDown(p(300.0, 200.0)),
            OverlayInput::PointerMove(p(250.0, 150.0)),
            OverlayInput::PointerUp(p(100.0, 120.0)),
        ]);
        assert_eq!(
            state,
            OverlayState::Confirmed(SelectionRegion {
                x: 100.0,
                y: 120.0,
                width: 200.0,
                height: 80.0,
            })
        );
    }

    #[test]
    fn test_small_drag_cancels() {
        let state = run(&[
            OverlayInput::ImageLoaded,
            OverlayInput::PointerDown(p(50.0, 50.0)),
            OverlayInput::PointerUp(p(60.0, 200.0)),
        ]);
        assert_eq!(state, OverlayState::Cancelled);

        let click = run(&[
            OverlayInput::ImageLoaded,
            OverlayInput::PointerDown(p(50.0, 50.0)),
            OverlayInput::PointerUp(p(50.0, 50.0)),
        ]);
        assert_eq!(click, OverlayState::Cancelled);
    }

    #[test]
    fn test_escape_cancels_while_armed_or_dragging() {
        assert_eq!(
            run(&[OverlayInput::ImageLoaded, OverlayInput::Escape]),
            OverlayState::Cancelled
        );
        assert_eq!(
            run(&[
                OverlayInput::ImageLoaded,
                OverlayInput::PointerDown(p(0.0, 0.0)),
                OverlayInput::PointerMove(p(500.0, 500.0)),
                OverlayInput::Escape,
            ]),
            OverlayState::Cancelled
        );
    }

    #[test]
    fn test_terminal_states_absorb_input() {
        let confirmed = run(&[
            OverlayInput::ImageLoaded,
            OverlayInput::PointerDown(p(0.0, 0.0)),
            OverlayInput::PointerUp(p(100.0, 100.0)),
        ]);
        assert!(confirmed.is_terminal());
        assert_eq!(reduce(confirmed, OverlayInput::Escape), confirmed);
        assert_eq!(
            reduce(OverlayState::Cancelled, OverlayInput::ImageLoaded),
            OverlayState::Cancelled
        );
    }

    #[test]
    fn test_view_projects_live_preview() {
        let state = run(&[
            OverlayInput::ImageLoaded,
            OverlayInput::PointerDown(p(40.0, 40.0)),
            OverlayInput::PointerMove(p(10.0, 90.0)),
        ]);
        let projected = view(&state);
        assert!(projected.wash);
        assert_eq!(
            projected.preview,
            Some(SelectionRegion {
                x: 10.0,
                y: 40.0,
                width: 30.0,
                height: 50.0,
            })
        );

        assert_eq!(view(&OverlayState::Armed).preview, None);
        assert!(!view(&OverlayState::Idle).wash);
    }
}
