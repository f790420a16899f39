use crate::layout::Size;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Placement plan is empty")]
    EmptyPlan,
}

pub type Result<T> = std::result::Result<T, CoverError>;

/// Physical trim definition of a cover wrap.
///
/// All lengths are millimetres. The bleed is added on all four outer edges.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverFormat {
    /// Width of one cover panel (front or back)
    pub width_mm: f32,
    /// Height of one cover panel
    pub height_mm: f32,
    /// Width of the spine panel
    pub spine_mm: f32,
    /// Wraparound margin on every outer edge
    pub bleed_mm: f32,
}

impl CoverFormat {
    /// Create a format, rejecting non-positive or non-finite lengths
    pub fn new(width_mm: f32, height_mm: f32, spine_mm: f32, bleed_mm: f32) -> Option<Self> {
        let format = Self {
            width_mm,
            height_mm,
            spine_mm,
            bleed_mm,
        };
        format.is_valid().then_some(format)
    }

    pub fn is_valid(&self) -> bool {
        [self.width_mm, self.height_mm, self.spine_mm, self.bleed_mm]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Bleed-inclusive width: back + spine + front + both bleeds
    pub fn document_width_mm(&self) -> f32 {
        self.bleed_mm + self.width_mm + self.spine_mm + self.width_mm + self.bleed_mm
    }

    /// Bleed-inclusive height
    pub fn document_height_mm(&self) -> f32 {
        self.bleed_mm + self.height_mm + self.bleed_mm
    }

    pub fn document_size_mm(&self) -> Size {
        Size::new(self.document_width_mm(), self.document_height_mm())
    }

    /// Aspect ratio (width / height) of one cover panel
    pub fn panel_aspect(&self) -> f32 {
        self.width_mm / self.height_mm
    }
}

/// Front cover composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LayoutVariant {
    /// A single symbol
    Icon,
    /// Title block only
    Text,
    /// Compact title block above a symbol
    #[default]
    TextIcon,
    /// One natural (uncropped, tinted) graphic
    Graphic,
    /// Cropped photo above a compact title block
    PhotoText,
    /// Photo filling the whole front panel, magazine-style title on top
    Magazine,
}

impl LayoutVariant {
    pub const ALL: [LayoutVariant; 6] = [
        LayoutVariant::Icon,
        LayoutVariant::Text,
        LayoutVariant::TextIcon,
        LayoutVariant::Graphic,
        LayoutVariant::PhotoText,
        LayoutVariant::Magazine,
    ];

    /// Whether the variant shows a main image slot
    pub fn has_main_image(self) -> bool {
        matches!(
            self,
            LayoutVariant::Graphic | LayoutVariant::PhotoText | LayoutVariant::Magazine
        )
    }

    /// Whether the main image goes through the crop tool
    pub fn uses_crop(self) -> bool {
        matches!(self, LayoutVariant::PhotoText | LayoutVariant::Magazine)
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutVariant::Icon => "icon",
            LayoutVariant::Text => "text",
            LayoutVariant::TextIcon => "text_icon",
            LayoutVariant::Graphic => "graphic",
            LayoutVariant::PhotoText => "photo_text",
            LayoutVariant::Magazine => "magazine",
        }
    }
}

impl FromStr for LayoutVariant {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        LayoutVariant::ALL
            .into_iter()
            .find(|variant| variant.name() == s)
            .ok_or_else(|| CoverError::Config(format!("Unknown layout variant: {}", s)))
    }
}

/// Shape a cropped image must exactly fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaskShape {
    #[default]
    Rect,
    Circle,
}

/// Where the icon or graphic sits on the front cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ImagePosition {
    #[default]
    Center,
    Top,
    BottomRight,
}

/// Straight-alpha RGBA colour, written as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([0xff, 0xff, 0xff, 0xff]);
    pub const INK: Color = Color([0x1a, 0x1a, 0x1a, 0xff]);
    pub const GUIDE: Color = Color([0x77, 0x77, 0x77, 0xff]);
    pub const PLACEHOLDER: Color = Color([0xaa, 0xaa, 0xaa, 0xff]);
    pub const BUTTON_GLYPH: Color = Color([0x33, 0x33, 0x33, 0xff]);

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 0xff])
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match digits.len() {
            3 => {
                let mut out = [0xff; 4];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some(Color(out))
            }
            6 => Some(Color([byte(0)?, byte(2)?, byte(4)?, 0xff])),
            8 => Some(Color([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.0;
        if a == 0xff {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = CoverError;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s).ok_or_else(|| CoverError::Config(format!("Invalid colour: {}", s)))
    }
}

/// Background/foreground pair from a designer palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorPair {
    #[cfg_attr(feature = "serde", serde(alias = "bg"))]
    pub background: Color,
    #[cfg_attr(feature = "serde", serde(alias = "text"))]
    pub foreground: Color,
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::Color;
    use serde::{Deserialize, Serialize};

    impl Serialize for Color {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(&self.to_hex())
        }
    }

    impl<'de> Deserialize<'de> for Color {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Color::from_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid colour: {}", s)))
        }
    }
}
