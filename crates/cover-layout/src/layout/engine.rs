//! Placement plan assembly
//!
//! The engine is a pure function of its inputs: the same format, spec and
//! canvas always produce an identical plan, so callers simply recompute the
//! whole plan on every change.

use crate::catalog::Catalog;
use crate::constants::FIT_MARGIN_PX;
use crate::options::CoverSpec;
use crate::types::CoverFormat;

use super::{
    CoverFrame, Element, PlacementPlan, Size, StrokeStyle, back_elements, front_elements,
    spine_elements,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Styling values that are choices rather than derived geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutStyle {
    /// Free space around the document when fitting it to the canvas (px)
    pub fit_margin: f32,
    /// Extra scale applied to a graphic in the bottom-right position
    pub bottom_right_graphic_scale: f32,
    pub guide: StrokeStyle,
    pub placeholder: StrokeStyle,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        Self {
            fit_margin: FIT_MARGIN_PX,
            bottom_right_graphic_scale: 0.6,
            guide: StrokeStyle::guide(),
            placeholder: StrokeStyle::placeholder(),
        }
    }
}

/// Lay out one cover for a canvas.
///
/// A degenerate canvas or format yields an empty plan. Paint order is the
/// background, then clipped photos and graphics, then fold guides, then
/// everything else.
///
/// # Arguments
/// * `format` - Trim definition, already resolved from the catalog
/// * `spec` - Cover specification
/// * `canvas` - Canvas size in pixels
/// * `style` - Styling constants
pub fn layout_cover(
    format: &CoverFormat,
    spec: &CoverSpec,
    canvas: Size,
    style: &LayoutStyle,
) -> PlacementPlan {
    let Some(frame) = CoverFrame::compute(format, canvas, style.fit_margin) else {
        log::debug!(
            "Skipping layout for degenerate canvas {}x{}",
            canvas.width,
            canvas.height
        );
        return PlacementPlan::empty(canvas);
    };

    let mut content = spine_elements(&frame, spec);
    content.extend(back_elements(&frame, spec));
    content.extend(front_elements(&frame, spec, style));

    let (images, rest): (Vec<Element>, Vec<Element>) = content
        .into_iter()
        .partition(|element| matches!(element, Element::Photo(_) | Element::Graphic(_)));

    let mut elements = Vec::with_capacity(images.len() + rest.len() + 7);
    elements.push(Element::Background {
        rect: frame.document,
        color: spec.cover_color,
    });
    elements.extend(images);
    elements.extend(
        frame
            .guide_lines()
            .into_iter()
            .map(|(from, to)| Element::Guide {
                from,
                to,
                stroke: style.guide,
            }),
    );
    elements.extend(rest);

    PlacementPlan {
        canvas,
        frame: Some(frame),
        elements,
    }
}

/// Layout entry point bound to a catalog and a style
#[derive(Debug, Clone, Default)]
pub struct CoverLayoutEngine {
    pub catalog: Catalog,
    pub style: LayoutStyle,
}

impl CoverLayoutEngine {
    pub fn new(catalog: Catalog, style: LayoutStyle) -> Self {
        Self { catalog, style }
    }

    /// Resolve the spec's format (falling back to the default) and lay it out
    pub fn layout(&self, spec: &CoverSpec, canvas: Size) -> PlacementPlan {
        let (_, format) = self.catalog.resolve(&spec.format);
        layout_cover(&format, spec, canvas, &self.style)
    }
}
