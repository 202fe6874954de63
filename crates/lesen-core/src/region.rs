use lesen_types::{OverlaySize, PixelSize, SelectionRegion, SourceRegion};

/// Selections this small (in overlay units) on either axis count as a cancel
pub const MIN_SELECTION_SIZE: f64 = 10.0;

/// Whether a selection is too small to be meant as a region
pub fn is_below_threshold(selection: &SelectionRegion) -> bool {
    selection.width <= MIN_SELECTION_SIZE || selection.height <= MIN_SELECTION_SIZE
}

/// Map an overlay selection into captured-image pixels
///
/// Returns `None` when the selection is a cancel: below the size threshold
/// (checked in overlay units so it does not depend on display density), or
/// empty once clamped to the image.
pub fn map_region(
    selection: &SelectionRegion,
    overlay: OverlaySize,
    image: PixelSize,
) -> Option<SourceRegion> {
    if is_below_threshold(selection) {
        return None;
    }
    if overlay.width <= 0.0 || overlay.height <= 0.0 || image.width == 0 || image.height == 0 {
        return None;
    }

    let scale_x = image.width as f64 / overlay.width;
    let scale_y = image.height as f64 / overlay.height;

    let x = scale(selection.x, scale_x).min(image.width);
    let y = scale(selection.y, scale_y).min(image.height);
    let width = scale(selection.width, scale_x).min(image.width - x);
    let height = scale(selection.height, scale_y).min(image.height - y);

    if width == 0 || height == 0 {
        return None;
    }

    Some(SourceRegion {
        x,
        y,
        width,
        height,
    })
}

fn scale(value: f64, factor: f64) -> u32 {
    (value * factor).round().max(0.0) as u32
}
