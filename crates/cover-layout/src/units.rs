//! Physical-to-device unit conversion
//!
//! Every conversion between millimetres and canvas pixels goes through these
//! functions so callers share one set of guards.

use crate::constants::{DOCK_HEIGHT_PX, MIN_CANVAS_HEIGHT_PX};
use crate::layout::Size;

/// Fit-to-viewport scale (pixels per unit) for a document inside a container.
///
/// Returns `min((cw - 2m) / dw, (ch - 2m) / dh)`, or `None` when the result
/// would not be a positive finite number: zero-area containers, containers
/// smaller than their margins, or degenerate documents. Callers skip layout
/// entirely on `None`.
///
/// # Arguments
/// * `container` - Available canvas size in pixels
/// * `document` - Full bleed-inclusive document size in physical units
/// * `margin` - Free space kept on every side, in pixels
pub fn pixels_per_unit(container: Size, document: Size, margin: f32) -> Option<f32> {
    if container.is_empty() || document.is_empty() {
        return None;
    }

    let scale_x = (container.width - 2.0 * margin) / document.width;
    let scale_y = (container.height - 2.0 * margin) / document.height;
    let scale = scale_x.min(scale_y);

    (scale.is_finite() && scale > 0.0).then_some(scale)
}

/// Convert a physical length to pixels. No clamping.
#[inline]
pub fn to_pixels(value: f32, scale: f32) -> f32 {
    value * scale
}

/// Convert a pixel length back to physical units, `None` for a degenerate scale
#[inline]
pub fn to_units(pixels: f32, scale: f32) -> Option<f32> {
    (scale.is_finite() && scale > 0.0).then(|| pixels / scale)
}

/// Canvas size left for the cover once the control dock is reserved.
///
/// The height never drops below the minimum canvas height, so a short
/// window still gets a usable preview. A zero-width workspace stays
/// zero-width and is rejected later by [`pixels_per_unit`].
pub fn canvas_for_workspace(workspace: Size) -> Size {
    let height = (workspace.height - DOCK_HEIGHT_PX).max(MIN_CANVAS_HEIGHT_PX);
    Size::new(workspace.width.max(0.0), height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixels_per_unit_picks_tighter_axis() {
        let scale = pixels_per_unit(Size::new(800.0, 600.0), Size::new(656.0, 333.0), 20.0);
        let scale = scale.unwrap();
        assert!((scale - 760.0 / 656.0).abs() < 1e-5);
        assert!((scale - 1.159).abs() < 0.001);
    }

    #[test]
    fn test_pixels_per_unit_degenerate() {
        let doc = Size::new(656.0, 333.0);
        assert_eq!(pixels_per_unit(Size::new(0.0, 600.0), doc, 20.0), None);
        assert_eq!(pixels_per_unit(Size::new(800.0, 0.0), doc, 20.0), None);
        assert_eq!(pixels_per_unit(Size::new(30.0, 30.0), doc, 20.0), None);
        assert_eq!(
            pixels_per_unit(Size::new(f32::INFINITY, 600.0), doc, 20.0),
            None
        );
        assert_eq!(
            pixels_per_unit(Size::new(800.0, 600.0), Size::new(0.0, 1.0), 20.0),
            None
        );
    }

    #[test]
    fn test_unit_round_trip() {
        let px = to_pixels(303.0, 1.5);
        assert!((px - 454.5).abs() < 1e-4);
        assert!((to_units(px, 1.5).unwrap() - 303.0).abs() < 1e-4);
        assert_eq!(to_units(10.0, 0.0), None);
    }

    #[test]
    fn test_canvas_for_workspace_reserves_dock() {
        assert_eq!(
            canvas_for_workspace(Size::new(1200.0, 900.0)),
            Size::new(1200.0, 800.0)
        );
        assert_eq!(
            canvas_for_workspace(Size::new(1200.0, 250.0)),
            Size::new(1200.0, MIN_CANVAS_HEIGHT_PX)
        );
    }
}
