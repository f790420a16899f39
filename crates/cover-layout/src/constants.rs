//! Shared constants for cover layout
//!
//! This module centralizes the physical measurements and magic numbers used
//! throughout the layout, crop and export code. Lengths suffixed `_MM` are
//! physical millimetres and scale uniformly with the viewport's px/mm.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimetres per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Standard print resolution (dots per inch)
pub const PRINT_DPI: f32 = 300.0;

/// Convert a dots-per-inch resolution to dots per millimetre
#[inline]
pub fn dpi_to_px_per_mm(dpi: f32) -> f32 {
    dpi / MM_PER_INCH
}

/// Screen scale substituted when the live scale is zero or not finite (px/mm)
pub const FALLBACK_SCREEN_SCALE: f32 = 10.0;

// =============================================================================
// Viewport
// =============================================================================

/// Margin kept free around the document when fitting it to the container (px)
pub const FIT_MARGIN_PX: f32 = 20.0;

/// Height reserved below the canvas for the control dock (px)
pub const DOCK_HEIGHT_PX: f32 = 100.0;

/// Smallest canvas height handed to the layout once the dock is reserved (px)
pub const MIN_CANVAS_HEIGHT_PX: f32 = 300.0;

// =============================================================================
// Spine and Back Cover
// =============================================================================

/// Width of the spine symbol
pub const SPINE_ICON_WIDTH_MM: f32 = 10.0;

/// Distance between the visible bottom edge and bottom-anchored content
pub const BOTTOM_INSET_MM: f32 = 15.0;

/// Spine lettering size
pub const SPINE_FONT_MM: f32 = 3.5;

/// Tracking applied to spine lettering (thousandths of an em)
pub const SPINE_LETTER_SPACING: f32 = 100.0;

/// Separator between title and date on the spine
pub const SPINE_SEPARATOR: &str = "  \u{2022}  ";

/// Copyright line size
pub const COPYRIGHT_FONT_MM: f32 = 3.0;

/// Copyright line opacity relative to the text opacity
pub const COPYRIGHT_OPACITY: f32 = 0.7;

/// Tracking applied to the copyright line
pub const COPYRIGHT_LETTER_SPACING: f32 = 80.0;

/// QR code edge length
pub const QR_SIZE_MM: f32 = 15.0;

/// Gap between the copyright baseline and the QR code
pub const QR_GAP_MM: f32 = 10.0;

// =============================================================================
// Front Cover
// =============================================================================

/// Default icon edge length (multiplied by the text scale)
pub const ICON_SIZE_MM: f32 = 20.0;

/// Gap between the compact text block and the icon in text-plus-icon layouts
pub const TEXT_ICON_GAP_MM: f32 = 15.0;

/// Title size of the regular text block
pub const TITLE_FONT_MM: f32 = 12.0;

/// Title size of the compact text block
pub const COMPACT_TITLE_FONT_MM: f32 = 8.0;

/// Date size under a text block (multiplied by the text scale)
pub const DATE_FONT_MM: f32 = 4.0;

/// Gap between the title and the date in the regular text block
pub const DATE_GAP_MM: f32 = 10.0;

/// Gap between the title and the date in the compact text block
pub const COMPACT_DATE_GAP_MM: f32 = 5.0;

/// Line height multiplier for title blocks
pub const TEXT_LINE_HEIGHT: f32 = 1.3;

/// Title shown while the user has not typed anything
pub const PLACEHOLDER_TITLE: &str = "THE VISUAL DIARY";

/// Lines reserved by the placeholder title so the block keeps its height
pub const PLACEHOLDER_TITLE_LINES: usize = 4;

/// Opacity of placeholder title and ghost icon
pub const PLACEHOLDER_OPACITY: f32 = 0.3;

/// Magazine title size
pub const MAGAZINE_TITLE_FONT_MM: f32 = 20.0;

/// Magazine date size
pub const MAGAZINE_DATE_FONT_MM: f32 = 6.0;

/// Gap between the magazine title and date
pub const MAGAZINE_DATE_GAP_MM: f32 = 5.0;

/// Fraction of the cover height the magazine title sits above centre
pub const MAGAZINE_TITLE_RAISE: f32 = 0.2;

/// Placeholder size relative to the safe zone when no magazine photo is set
pub const MAGAZINE_PLACEHOLDER_RATIO: f32 = 0.6;

/// Upward shift of the feature image in graphic and photo layouts
pub const FEATURE_RAISE_MM: f32 = 20.0;

/// Extra upward shift for the `Top` image position
pub const TOP_POSITION_RAISE_MM: f32 = 30.0;

/// Horizontal inset from the right trim for the `BottomRight` image position
pub const BOTTOM_RIGHT_INSET_X_MM: f32 = 20.0;

/// Vertical inset from the bottom trim for the `BottomRight` image position
pub const BOTTOM_RIGHT_INSET_Y_MM: f32 = 30.0;

/// Longest side of a natural graphic before text scaling
pub const GRAPHIC_EXTENT_MM: f32 = 100.0;

/// Placeholder edge length for the graphic layout
pub const GRAPHIC_PLACEHOLDER_MM: f32 = 80.0;

/// Photo slot bounding box width in the photo-plus-text layout
pub const PHOTO_SLOT_WIDTH_MM: f32 = 120.0;

/// Photo slot bounding box height in the photo-plus-text layout
pub const PHOTO_SLOT_HEIGHT_MM: f32 = 80.0;

/// Gap between the photo slot and the text below it
pub const PHOTO_TEXT_GAP_MM: f32 = 15.0;

/// Radius of the "+" button drawn on empty slots
pub const PLACEHOLDER_BUTTON_RADIUS_MM: f32 = 8.0;

/// Stroke width of the "+" glyph on empty slots
pub const PLACEHOLDER_PLUS_WIDTH_MM: f32 = 1.0;

/// Length of the "+" glyph relative to the button radius
pub const PLACEHOLDER_PLUS_RATIO: f32 = 0.6;

/// Allowed text scale steps
pub const TEXT_SCALES: [f32; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

/// Default icon asset used as a ghost when no symbol is chosen
pub const DEFAULT_ICON_SOURCE: &str = "assets/symbols/love_heart_icon.png";

// =============================================================================
// Crop Tool
// =============================================================================

/// Edge length of the square crop preview canvas (px)
pub const CROP_CANVAS_PX: f32 = 300.0;

/// Fraction of the preview canvas the mask occupies on its longer side
pub const CROP_MASK_FILL: f32 = 0.8;

/// Smallest zoom factor
pub const CROP_MIN_ZOOM: f32 = 1.0;

/// Largest zoom factor
pub const CROP_MAX_ZOOM: f32 = 3.0;
