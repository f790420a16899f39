//! Print export calculation
//!
//! The canvas is laid out at the live screen scale (px/mm). Rasterising it at
//! `multiplier` yields an image at the target print resolution.

use crate::constants::{FALLBACK_SCREEN_SCALE, PRINT_DPI, dpi_to_px_per_mm};
use crate::layout::{PlacementPlan, Rect};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical output resolution
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrintTarget {
    pub dpi: f32,
}

impl Default for PrintTarget {
    fn default() -> Self {
        Self { dpi: PRINT_DPI }
    }
}

impl PrintTarget {
    pub fn new(dpi: f32) -> Self {
        Self { dpi }
    }

    /// Target dots per millimetre
    pub fn px_per_mm(&self) -> f32 {
        dpi_to_px_per_mm(self.dpi)
    }
}

/// Export multiplier converting the live scale to `target_px_per_mm`.
///
/// A zero, negative or non-finite `current_scale` is replaced by the
/// fallback screen scale, so the result is always finite for a finite target.
pub fn print_multiplier(target_px_per_mm: f32, current_scale: f32) -> f32 {
    let scale = if current_scale.is_finite() && current_scale > 0.0 {
        current_scale
    } else {
        log::warn!(
            "Invalid screen scale {}, using {} px/mm",
            current_scale,
            FALLBACK_SCREEN_SCALE
        );
        FALLBACK_SCREEN_SCALE
    };
    target_px_per_mm / scale
}

/// Encoded raster format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Everything the renderer needs for one raster export
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExportSettings {
    pub format: ExportFormat,
    /// JPEG quality in `[0, 1]`; ignored for PNG
    pub quality: f32,
    pub multiplier: f32,
    /// Canvas region to export, `None` for the whole canvas
    pub region: Option<Rect>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            quality: 1.0,
            multiplier: 1.0,
            region: None,
        }
    }
}

impl ExportSettings {
    /// Settings for a print file: the bleed-inclusive document at `target`.
    ///
    /// An empty plan exports the whole canvas at the fallback multiplier.
    pub fn for_print(plan: &PlacementPlan, target: PrintTarget, format: ExportFormat) -> Self {
        let scale = plan.scale().unwrap_or(0.0);
        let multiplier = print_multiplier(target.px_per_mm(), scale);
        log::info!(
            "Print export at {} dpi: multiplier {:.3} for screen scale {:.3} px/mm",
            target.dpi,
            multiplier,
            scale
        );
        Self {
            format,
            quality: 1.0,
            multiplier,
            region: plan.frame.as_ref().map(|frame| frame.document),
        }
    }

    /// Output size in whole pixels for a canvas of `canvas` pixels
    pub fn output_size(&self, canvas: crate::layout::Size) -> (u32, u32) {
        let base = self.region.map(|r| r.size()).unwrap_or(canvas);
        let scale = |v: f32| (v * self.multiplier).round().max(1.0) as u32;
        (scale(base.width), scale(base.height))
    }
}
