//! Document frame calculation
//!
//! Places the bleed-inclusive cover wrap centred in the canvas and derives the
//! fold lines, anchor points and safe zones every placement builds on.

use crate::types::CoverFormat;
use crate::units::{pixels_per_unit, to_pixels};

use super::{Anchors, CoverFrame, Point, Rect, SafeZones, Size};

impl CoverFrame {
    /// Compute the frame for `format` on a canvas of `canvas` pixels.
    ///
    /// Returns `None` when the canvas is degenerate or the format invalid;
    /// callers render nothing in that case.
    ///
    /// # Arguments
    /// * `format` - Trim definition in millimetres
    /// * `canvas` - Available canvas size in pixels
    /// * `margin` - Free space kept around the document, in pixels
    pub fn compute(format: &CoverFormat, canvas: Size, margin: f32) -> Option<Self> {
        if !format.is_valid() {
            return None;
        }
        let document_mm = format.document_size_mm();
        let scale = pixels_per_unit(canvas, document_mm, margin)?;

        let document_px = document_mm.scale(scale);
        let origin = Point::new(
            (canvas.width - document_px.width) / 2.0,
            (canvas.height - document_px.height) / 2.0,
        );
        let document = Rect::new(origin.x, origin.y, document_px.width, document_px.height);

        let bleed = to_pixels(format.bleed_mm, scale);
        let panel_width = to_pixels(format.width_mm, scale);
        let spine_width = to_pixels(format.spine_mm, scale);
        let cover_height = to_pixels(format.height_mm, scale);

        let back_start = origin.x + bleed;
        let spine_start = back_start + panel_width;
        let spine_end = spine_start + spine_width;
        let front_end = spine_end + panel_width;
        let x_edges = [
            origin.x,
            back_start,
            spine_start,
            spine_end,
            front_end,
            front_end + bleed,
        ];

        let cover_top = origin.y + bleed;
        let cover_bottom = cover_top + cover_height;
        let y_edges = [origin.y, cover_top, cover_bottom, cover_bottom + bleed];

        let back = Rect::new(back_start, cover_top, panel_width, cover_height);
        let front = Rect::new(spine_end, cover_top, panel_width, cover_height);

        let anchors = Anchors {
            spine_center: Point::new(
                spine_start + spine_width / 2.0,
                document.center_y(),
            ),
            back_center: back.center(),
            front_center: front.center(),
        };

        Some(Self {
            scale,
            document_mm,
            document,
            x_edges,
            y_edges,
            anchors,
            safe_zones: SafeZones { front, back },
        })
    }

    /// Millimetres to canvas pixels at this frame's scale
    #[inline]
    pub fn mm(&self, value: f32) -> f32 {
        to_pixels(value, self.scale)
    }

    /// Fold and trim guides: the four interior vertical edges across the full
    /// document height, then the cover top and bottom across the full width.
    pub fn guide_lines(&self) -> Vec<(Point, Point)> {
        let top = self.y_edges[0];
        let bottom = self.y_edges[3];
        let left = self.x_edges[0];
        let right = self.x_edges[5];

        let mut lines: Vec<(Point, Point)> = self.x_edges[1..5]
            .iter()
            .map(|&x| (Point::new(x, top), Point::new(x, bottom)))
            .collect();
        lines.extend(
            self.y_edges[1..3]
                .iter()
                .map(|&y| (Point::new(left, y), Point::new(right, y))),
        );
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_30() -> CoverFormat {
        CoverFormat::new(303.0, 303.0, 20.0, 15.0).unwrap()
    }

    #[test]
    fn test_scenario_scale_and_centering() {
        let frame = CoverFrame::compute(&square_30(), Size::new(800.0, 600.0), 20.0).unwrap();
        assert!((frame.scale - 760.0 / 656.0).abs() < 1e-5);
        assert_eq!(frame.document_mm, Size::new(656.0, 333.0));
        // Limited by width: 20 px margin left and right
        assert!((frame.document.x - 20.0).abs() < 1e-3);
        assert!((frame.document.right() - 780.0).abs() < 1e-3);
        assert!((frame.document.center_y() - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_edges_follow_band_widths() {
        let frame = CoverFrame::compute(&square_30(), Size::new(1312.0, 1000.0), 0.0).unwrap();
        assert!((frame.scale - 2.0).abs() < 1e-6);
        let expected = [0.0, 30.0, 636.0, 676.0, 1282.0, 1312.0];
        for (edge, want) in frame.x_edges.iter().zip(expected) {
            assert!((edge - want).abs() < 1e-3, "{} != {}", edge, want);
        }
        assert!((frame.y_edges[1] - frame.y_edges[0] - 30.0).abs() < 1e-3);
        assert!((frame.cover_height() - 606.0).abs() < 1e-3);
        assert!((frame.spine().width - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_safe_zones_exclude_bleed() {
        let frame = CoverFrame::compute(&square_30(), Size::new(800.0, 600.0), 20.0).unwrap();
        let zones = frame.safe_zones;
        assert!((zones.back.x - frame.x_edges[1]).abs() < 1e-4);
        assert!((zones.front.right() - frame.x_edges[4]).abs() < 1e-4);
        assert!(frame.document.contains_rect(&zones.front, 0.0));
        assert_eq!(frame.anchors.front_center, zones.front.center());
        assert!(
            (frame.anchors.spine_center.x - (frame.x_edges[2] + frame.x_edges[3]) / 2.0).abs()
                < 1e-4
        );
    }

    #[test]
    fn test_guide_lines() {
        let frame = CoverFrame::compute(&square_30(), Size::new(800.0, 600.0), 20.0).unwrap();
        let lines = frame.guide_lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[..4].iter().all(|(a, b)| a.x == b.x));
        assert!(lines[4..].iter().all(|(a, b)| a.y == b.y));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(CoverFrame::compute(&square_30(), Size::new(0.0, 0.0), 20.0).is_none());
        let bad = CoverFormat {
            width_mm: 0.0,
            height_mm: 303.0,
            spine_mm: 20.0,
            bleed_mm: 15.0,
        };
        assert!(CoverFrame::compute(&bad, Size::new(800.0, 600.0), 20.0).is_none());
    }
}
