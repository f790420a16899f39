//! Read-only format, palette and asset tables
//!
//! The catalog is an input to the layout, never computed by it. The built-in
//! default carries the three square formats; palettes and asset lists are
//! normally loaded from JSON.

use crate::types::{ColorPair, CoverError, CoverFormat, Result};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Format used when none is chosen or the chosen key is unknown
pub const DEFAULT_FORMAT: &str = "30x30";

/// Asset category folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AssetKind {
    /// Small tintable symbols for icon layouts and the spine
    Symbols,
    /// Larger natural graphics for the graphic layout
    Graphics,
}

impl AssetKind {
    pub fn folder(self) -> &'static str {
        match self {
            AssetKind::Symbols => "symbols",
            AssetKind::Graphics => "graphics",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Catalog {
    /// Trim formats by key
    pub formats: BTreeMap<String, CoverFormat>,
    /// Named palettes of background/foreground pairs
    pub palettes: BTreeMap<String, Vec<ColorPair>>,
    /// Asset file names by kind, then by collection name
    pub assets: BTreeMap<AssetKind, BTreeMap<String, Vec<String>>>,
}

impl Default for Catalog {
    fn default() -> Self {
        let square = |side: f32| CoverFormat {
            width_mm: side,
            height_mm: side,
            spine_mm: 20.0,
            bleed_mm: 15.0,
        };
        let formats = BTreeMap::from([
            ("30x30".to_string(), square(303.0)),
            ("25x25".to_string(), square(253.0)),
            ("20x20".to_string(), square(203.0)),
        ]);
        Self {
            formats,
            palettes: BTreeMap::new(),
            assets: BTreeMap::new(),
        }
    }
}

impl Catalog {
    /// Load a catalog from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let catalog: Catalog = serde_json::from_slice(&bytes)
            .map_err(|e| CoverError::Config(format!("Failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every format must be valid and the default format must exist
    pub fn validate(&self) -> Result<()> {
        if let Some((name, _)) = self.formats.iter().find(|(_, format)| !format.is_valid()) {
            return Err(CoverError::Config(format!(
                "Format {} has non-positive dimensions",
                name
            )));
        }
        if !self.formats.contains_key(DEFAULT_FORMAT) {
            return Err(CoverError::Config(format!(
                "Catalog lacks the default format {}",
                DEFAULT_FORMAT
            )));
        }
        Ok(())
    }

    pub fn format(&self, key: &str) -> Option<&CoverFormat> {
        self.formats.get(key)
    }

    /// Look up a format, falling back to the default format for unknown keys.
    ///
    /// Returns the key actually used with the format. If even the default is
    /// missing the built-in 30x30 trim is used.
    pub fn resolve(&self, key: &str) -> (&str, CoverFormat) {
        if let Some((name, format)) = self.formats.get_key_value(key) {
            return (name.as_str(), *format);
        }
        log::warn!("Unknown format {:?}, falling back to {}", key, DEFAULT_FORMAT);
        let format = self.formats.get(DEFAULT_FORMAT).copied().unwrap_or(CoverFormat {
            width_mm: 303.0,
            height_mm: 303.0,
            spine_mm: 20.0,
            bleed_mm: 15.0,
        });
        (DEFAULT_FORMAT, format)
    }

    pub fn palette(&self, name: &str) -> Option<&[ColorPair]> {
        self.palettes.get(name).map(Vec::as_slice)
    }

    /// Collections of one asset kind
    pub fn collections(&self, kind: AssetKind) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.assets
            .get(&kind)
            .into_iter()
            .flat_map(|collections| collections.iter())
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Path of a full-size asset
    pub fn asset_path(kind: AssetKind, file: &str) -> String {
        format!("assets/{}/{}", kind.folder(), file)
    }

    /// Path of an asset's thumbnail: `name.png` becomes `name_icon.png`
    /// unless the file already is a thumbnail.
    pub fn preview_path(kind: AssetKind, file: &str) -> String {
        let preview = if file.contains("_icon") {
            file.to_string()
        } else {
            match file.strip_suffix(".png") {
                Some(stem) => format!("{}_icon.png", stem),
                None => file.to_string(),
            }
        };
        Self::asset_path(kind, &preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_formats() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        let format = catalog.format("25x25").unwrap();
        assert_eq!(format.width_mm, 253.0);
        assert_eq!(format.document_width_mm(), 253.0 * 2.0 + 20.0 + 30.0);
    }

    #[test]
    fn test_resolve_falls_back() {
        let catalog = Catalog::default();
        let (name, format) = catalog.resolve("99x99");
        assert_eq!(name, DEFAULT_FORMAT);
        assert_eq!(format.width_mm, 303.0);

        let (name, format) = catalog.resolve("20x20");
        assert_eq!(name, "20x20");
        assert_eq!(format.height_mm, 203.0);
    }

    #[test]
    fn test_preview_path_rule() {
        assert_eq!(
            Catalog::preview_path(AssetKind::Symbols, "love_heart.png"),
            "assets/symbols/love_heart_icon.png"
        );
        assert_eq!(
            Catalog::preview_path(AssetKind::Graphics, "test_2x2_icon.png"),
            "assets/graphics/test_2x2_icon.png"
        );
    }
}
