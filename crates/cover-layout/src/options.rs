use crate::constants::TEXT_SCALES;
use crate::crop::ImageSlot;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete cover configuration
///
/// Owned by a single controller and passed by reference to the layout engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoverSpec {
    /// Catalog key of the trim format, e.g. `30x30`
    pub format: String,
    pub layout: LayoutVariant,
    pub image_position: ImagePosition,
    pub mask: MaskSettings,
    pub cover_color: Color,
    pub text: TextSpec,
    pub images: ImageSpec,
    pub spine: SpineSpec,
    pub qr: QrSpec,
}

impl Default for CoverSpec {
    fn default() -> Self {
        Self {
            format: crate::catalog::DEFAULT_FORMAT.to_string(),
            layout: LayoutVariant::TextIcon,
            image_position: ImagePosition::Center,
            mask: MaskSettings::default(),
            cover_color: Color::WHITE,
            text: TextSpec::default(),
            images: ImageSpec::default(),
            spine: SpineSpec::default(),
            qr: QrSpec::default(),
        }
    }
}

/// Shape and aspect of the crop mask for photo slots
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaskSettings {
    pub shape: MaskShape,
    /// Width:height; ignored for circles
    pub aspect: f32,
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self {
            shape: MaskShape::Rect,
            aspect: 1.0,
        }
    }
}

impl MaskSettings {
    pub fn circle() -> Self {
        Self {
            shape: MaskShape::Circle,
            aspect: 1.0,
        }
    }

    pub fn rect(aspect: f32) -> Self {
        Self {
            shape: MaskShape::Rect,
            aspect,
        }
    }

    /// Aspect the slot actually uses; circles are always 1:1
    pub fn effective_aspect(&self) -> f32 {
        match self.shape {
            MaskShape::Circle => 1.0,
            MaskShape::Rect => self.aspect,
        }
    }
}

/// One title line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextLine {
    pub text: String,
    #[cfg_attr(feature = "serde", serde(alias = "upper"))]
    pub uppercase: bool,
}

impl TextLine {
    pub fn new(text: impl Into<String>, uppercase: bool) -> Self {
        Self {
            text: text.into(),
            uppercase,
        }
    }

    /// Line text with the case rule applied
    pub fn processed(&self) -> String {
        if self.uppercase {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        }
    }
}

/// Title lines, date, copyright and typography
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextSpec {
    pub lines: [TextLine; 3],
    pub date: String,
    pub copyright: String,
    pub font: String,
    pub color: Color,
    /// One of the allowed text scale steps
    pub scale: f32,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            lines: [
                TextLine::new("THE VISUAL DIARY", true),
                TextLine::default(),
                TextLine::default(),
            ],
            date: String::new(),
            copyright: String::new(),
            font: "Tenor Sans".to_string(),
            color: Color::INK,
            scale: 1.0,
        }
    }
}

impl TextSpec {
    /// Whether any title line has text
    pub fn has_title(&self) -> bool {
        self.lines.iter().any(|line| !line.text.is_empty())
    }

    /// Non-empty title lines with the case rule applied
    pub fn processed_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(TextLine::processed)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Chosen image assets
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImageSpec {
    /// Symbol used by icon layouts and the spine
    pub icon: Option<String>,
    /// Graphic or photo of the image-bearing layouts
    pub main: Option<ImageSlot>,
}

/// What appears on the spine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpineSpec {
    pub symbol: bool,
    pub title: bool,
    pub date: bool,
}

impl Default for SpineSpec {
    fn default() -> Self {
        Self {
            symbol: true,
            title: true,
            date: true,
        }
    }
}

/// QR code on the back cover
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QrSpec {
    pub enabled: bool,
    pub url: String,
}

impl QrSpec {
    /// Payload to encode, `None` unless enabled with a URL
    pub fn payload(&self) -> Option<&str> {
        (self.enabled && !self.url.is_empty()).then_some(self.url.as_str())
    }
}

impl CoverSpec {
    /// Load a cover specification from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        Self::from_json(&bytes)
    }

    /// Parse a cover specification from JSON bytes
    #[cfg(feature = "serde")]
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| CoverError::Config(format!("Failed to parse cover spec: {}", e)))
    }

    /// Validate the specification
    pub fn validate(&self) -> Result<()> {
        if self.format.trim().is_empty() {
            return Err(CoverError::Config("No format specified".to_string()));
        }

        let aspect = self.mask.aspect;
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(CoverError::Config(format!(
                "Mask aspect must be positive, got {}",
                aspect
            )));
        }

        if !TEXT_SCALES.contains(&self.text.scale) {
            return Err(CoverError::Config(format!(
                "Text scale {} is not one of {:?}",
                self.text.scale, TEXT_SCALES
            )));
        }

        if let Some(main) = &self.images.main {
            if main.source.is_empty() {
                return Err(CoverError::Config("Main image has no source".to_string()));
            }
            if !main.target_aspect.is_finite() || main.target_aspect <= 0.0 {
                return Err(CoverError::Config(
                    "Main image target aspect must be positive".to_string(),
                ));
            }
            if let Some(crop) = &main.crop
                && !crop.is_valid()
            {
                return Err(CoverError::Config(
                    "Main image crop placement is invalid".to_string(),
                ));
            }
            if !self.layout.has_main_image() {
                log::debug!(
                    "Main image is ignored by the {} layout",
                    self.layout.name()
                );
            }
        }

        if self.qr.enabled && self.qr.url.trim().is_empty() {
            log::warn!("QR code enabled without a URL; it will not be placed");
        }

        Ok(())
    }
}
