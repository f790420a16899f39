//! Single owner of the mutable cover specification
//!
//! Every change goes through [`CoverController::apply`]; plans are always
//! re-derived from the whole current state.

use crate::constants::TEXT_SCALES;
use crate::crop::{CropPlacement, CropRequest, ImageSlot};
use crate::layout::{CoverLayoutEngine, PlacementPlan, Size};
use crate::options::{CoverSpec, MaskSettings};
use crate::types::*;
use crate::units::canvas_for_workspace;

/// Spine element toggled by [`CoverEdit::ToggleSpine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinePart {
    Symbol,
    Title,
    Date,
}

/// One user edit of the cover
#[derive(Debug, Clone, PartialEq)]
pub enum CoverEdit {
    SetFormat(String),
    /// Switching to a different variant drops the main image
    SetLayout(LayoutVariant),
    SetImagePosition(ImagePosition),
    SetMask(MaskSettings),
    SetCoverColor(Color),
    SetTextColor(Color),
    /// Background and text colour from a palette pair
    ApplyColors(ColorPair),
    SetLine { index: usize, text: String },
    SetLineUppercase { index: usize, uppercase: bool },
    SetDate(String),
    SetCopyright(String),
    SetFont(String),
    SetTextScale(f32),
    SetIcon(Option<String>),
    /// Natural graphic for the graphic layout
    SetGraphic(String),
    ClearMainImage,
    ToggleSpine(SpinePart),
    /// `Some(url)` enables the QR code, `None` removes it
    SetQr(Option<String>),
}

#[derive(Debug, Clone)]
pub struct CoverController {
    spec: CoverSpec,
    engine: CoverLayoutEngine,
    canvas: Size,
}

impl CoverController {
    pub fn new(engine: CoverLayoutEngine) -> Self {
        Self::with_spec(engine, CoverSpec::default())
    }

    pub fn with_spec(engine: CoverLayoutEngine, spec: CoverSpec) -> Self {
        Self {
            spec,
            engine,
            canvas: Size::default(),
        }
    }

    pub fn spec(&self) -> &CoverSpec {
        &self.spec
    }

    /// Replace the whole specification, e.g. after loading one from disk
    pub fn set_spec(&mut self, spec: CoverSpec) {
        self.spec = spec;
        self.drop_stale_crop();
    }

    pub fn engine(&self) -> &CoverLayoutEngine {
        &self.engine
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Trim format in effect, after fallback
    pub fn format(&self) -> CoverFormat {
        self.engine.catalog.resolve(&self.spec.format).1
    }

    /// Set the canvas directly
    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    /// Set the canvas from the whole workspace, reserving the control dock
    pub fn resize_workspace(&mut self, workspace: Size) {
        self.canvas = canvas_for_workspace(workspace);
    }

    /// Apply one edit. Rejected edits leave the spec untouched.
    pub fn apply(&mut self, edit: CoverEdit) -> Result<()> {
        let spec = &mut self.spec;
        match edit {
            CoverEdit::SetFormat(format) => {
                if self.engine.catalog.format(&format).is_none() {
                    return Err(CoverError::Config(format!("Unknown format: {}", format)));
                }
                spec.format = format;
            }
            CoverEdit::SetLayout(layout) => {
                if spec.layout != layout {
                    spec.images.main = None;
                }
                spec.layout = layout;
                spec.mask = MaskSettings::default();
            }
            CoverEdit::SetImagePosition(position) => spec.image_position = position,
            CoverEdit::SetMask(mask) => {
                if !mask.aspect.is_finite() || mask.aspect <= 0.0 {
                    return Err(CoverError::Config(format!(
                        "Mask aspect must be positive, got {}",
                        mask.aspect
                    )));
                }
                spec.mask = mask;
            }
            CoverEdit::SetCoverColor(color) => spec.cover_color = color,
            CoverEdit::SetTextColor(color) => spec.text.color = color,
            CoverEdit::ApplyColors(pair) => {
                spec.cover_color = pair.background;
                spec.text.color = pair.foreground;
            }
            CoverEdit::SetLine { index, text } => line_mut(spec, index)?.text = text,
            CoverEdit::SetLineUppercase { index, uppercase } => {
                line_mut(spec, index)?.uppercase = uppercase
            }
            CoverEdit::SetDate(date) => spec.text.date = date,
            CoverEdit::SetCopyright(copyright) => spec.text.copyright = copyright,
            CoverEdit::SetFont(font) => spec.text.font = font,
            CoverEdit::SetTextScale(scale) => {
                if !TEXT_SCALES.contains(&scale) {
                    return Err(CoverError::Config(format!(
                        "Text scale {} is not one of {:?}",
                        scale, TEXT_SCALES
                    )));
                }
                spec.text.scale = scale;
            }
            CoverEdit::SetIcon(icon) => spec.images.icon = icon,
            CoverEdit::SetGraphic(source) => {
                if spec.layout != LayoutVariant::Graphic {
                    return Err(CoverError::Config(format!(
                        "The {} layout has no graphic slot",
                        spec.layout.name()
                    )));
                }
                spec.images.main = Some(ImageSlot::natural(source));
            }
            CoverEdit::ClearMainImage => spec.images.main = None,
            CoverEdit::ToggleSpine(part) => {
                let flag = match part {
                    SpinePart::Symbol => &mut spec.spine.symbol,
                    SpinePart::Title => &mut spec.spine.title,
                    SpinePart::Date => &mut spec.spine.date,
                };
                *flag = !*flag;
            }
            CoverEdit::SetQr(Some(url)) => {
                spec.qr.enabled = true;
                spec.qr.url = url;
            }
            CoverEdit::SetQr(None) => spec.qr.enabled = false,
        }
        self.drop_stale_crop();
        Ok(())
    }

    /// Clear a cropped main image whose slot no longer has the shape it was
    /// cropped for, so a photo never leaves gaps inside its mask.
    fn drop_stale_crop(&mut self) {
        let Some(main) = &self.spec.images.main else {
            return;
        };
        let fits = match self.crop_request() {
            Some(request) => main.fits(&request),
            None => main.crop.is_none(),
        };
        if !fits {
            log::debug!(
                "Dropping crop of {}: the {} slot changed shape",
                main.source,
                self.spec.layout.name()
            );
            self.spec.images.main = None;
        }
    }

    /// Apply pair `index` of the named catalog palette
    pub fn apply_palette(&mut self, palette: &str, index: usize) -> Result<()> {
        let pair = self
            .engine
            .catalog
            .palette(palette)
            .and_then(|pairs| pairs.get(index))
            .copied()
            .ok_or_else(|| {
                CoverError::Config(format!("No colour pair {} in palette {}", index, palette))
            })?;
        self.apply(CoverEdit::ApplyColors(pair))
    }

    /// Crop request for the current layout's photo slot, `None` if it has none
    pub fn crop_request(&self) -> Option<CropRequest> {
        match self.spec.layout {
            LayoutVariant::PhotoText => Some(CropRequest::new(
                self.spec.mask.effective_aspect(),
                self.spec.mask.shape,
            )),
            LayoutVariant::Magazine => {
                Some(CropRequest::new(self.format().panel_aspect(), MaskShape::Rect))
            }
            _ => None,
        }
    }

    /// Store a committed crop of `source` as the main image.
    ///
    /// `cropped_for` is the request the crop session was started with; it
    /// must still match the current slot.
    pub fn commit_crop(
        &mut self,
        source: impl Into<String>,
        cropped_for: &CropRequest,
        placement: CropPlacement,
    ) -> Result<()> {
        let request = self.crop_request().ok_or_else(|| {
            CoverError::Config(format!(
                "The {} layout has no photo slot",
                self.spec.layout.name()
            ))
        })?;
        if !request.same_slot(cropped_for) {
            return Err(CoverError::Config(format!(
                "Crop was made for a {:?} slot of aspect {}, the slot is now {:?} with aspect {}",
                cropped_for.mask, cropped_for.aspect, request.mask, request.aspect
            )));
        }
        if !placement.is_valid() {
            return Err(CoverError::Config("Crop placement is invalid".to_string()));
        }
        self.spec.images.main = Some(ImageSlot::cropped(source, &request, placement));
        Ok(())
    }

    /// Lay out the current state on the current canvas
    pub fn layout(&self) -> PlacementPlan {
        self.engine.layout(&self.spec, self.canvas)
    }
}

fn line_mut(spec: &mut CoverSpec, index: usize) -> Result<&mut crate::options::TextLine> {
    spec.text
        .lines
        .get_mut(index)
        .ok_or_else(|| CoverError::Config(format!("No title line {}", index)))
}
