//! Layout data types for cover rendering
//!
//! These types describe a fully resolved placement plan: absolute canvas
//! pixels, y growing downward, (0, 0) at the top-left of the canvas.

use crate::types::{Color, MaskShape};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair (pixels or millimetres depending on context)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Width divided by height
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Largest size with the given aspect that fits inside `self`
    pub fn fit_aspect(self, aspect: f32) -> Self {
        if self.width / self.height > aspect {
            Self::new(self.height * aspect, self.height)
        } else {
            Self::new(self.width, self.width / aspect)
        }
    }
}

/// An axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether `other` lies entirely inside, allowing `tolerance` px of slack per edge
    pub fn contains_rect(&self, other: &Rect, tolerance: f32) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }

    /// Overlap of two rectangles, `None` when they do not intersect
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Rect::new(x, y, right - x, bottom - y))
    }
}

/// Horizontal origin of an anchored element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OriginX {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical origin of an anchored element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OriginY {
    Top,
    #[default]
    Center,
    Bottom,
}

/// A point plus which part of the element sits on it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchor {
    pub point: Point,
    pub origin_x: OriginX,
    pub origin_y: OriginY,
}

impl Anchor {
    pub fn new(point: Point, origin_x: OriginX, origin_y: OriginY) -> Self {
        Self {
            point,
            origin_x,
            origin_y,
        }
    }

    pub fn center(point: Point) -> Self {
        Self::new(point, OriginX::Center, OriginY::Center)
    }

    pub fn top(point: Point) -> Self {
        Self::new(point, OriginX::Center, OriginY::Top)
    }

    pub fn bottom(point: Point) -> Self {
        Self::new(point, OriginX::Center, OriginY::Bottom)
    }

    pub fn bottom_right(point: Point) -> Self {
        Self::new(point, OriginX::Right, OriginY::Bottom)
    }

    /// Bounding box of an element of `size` placed at this anchor
    pub fn place(&self, size: Size) -> Rect {
        let x = match self.origin_x {
            OriginX::Left => self.point.x,
            OriginX::Center => self.point.x - size.width / 2.0,
            OriginX::Right => self.point.x - size.width,
        };
        let y = match self.origin_y {
            OriginY::Top => self.point.y,
            OriginY::Center => self.point.y - size.height / 2.0,
            OriginY::Bottom => self.point.y - size.height,
        };
        Rect::new(x, y, size.width, size.height)
    }
}

/// Stroke appearance for outlines and guides
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths in pixels, `None` for a solid line
    pub dash: Option<[f32; 2]>,
    pub opacity: f32,
}

impl StrokeStyle {
    /// Dashed grey fold guide
    pub fn guide() -> Self {
        Self {
            color: Color::GUIDE,
            width: 1.0,
            dash: Some([5.0, 5.0]),
            opacity: 0.5,
        }
    }

    /// Dashed outline of an empty image slot
    pub fn placeholder() -> Self {
        Self {
            color: Color::PLACEHOLDER,
            width: 1.5,
            dash: Some([10.0, 10.0]),
            opacity: 1.0,
        }
    }
}

/// Clip region applied to an element
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClipShape {
    Rect(Rect),
    Circle { center: Point, radius: f32 },
}

impl ClipShape {
    /// Clip matching a slot rectangle and mask shape; circles use the shorter side
    pub fn for_slot(slot: Rect, mask: MaskShape) -> Self {
        match mask {
            MaskShape::Rect => ClipShape::Rect(slot),
            MaskShape::Circle => ClipShape::Circle {
                center: slot.center(),
                radius: slot.width.min(slot.height) / 2.0,
            },
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        match self {
            ClipShape::Rect(rect) => rect.contains_point(p),
            ClipShape::Circle { center, radius } => {
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }

    pub fn bounds(&self) -> Rect {
        match *self {
            ClipShape::Rect(rect) => rect,
            ClipShape::Circle { center, radius } => {
                Rect::from_center(center, Size::new(radius * 2.0, radius * 2.0))
            }
        }
    }
}

/// Absolute image transform: centre position, uniform scale and rotation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageTransform {
    pub center: Point,
    pub scale: f32,
    pub rotation_degrees: f32,
}

/// What a text element is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextRole {
    Title,
    Date,
    Spine,
    Copyright,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TextElement {
    pub role: TextRole,
    /// Lines separated by `\n`
    pub text: String,
    pub font_family: String,
    pub font_size: f32,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub color: Color,
    pub opacity: f32,
    pub anchor: Anchor,
    pub rotation_degrees: f32,
    pub shadow: bool,
}

/// A symbol scaled to `width`, optionally tinted
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IconElement {
    pub source: String,
    pub anchor: Anchor,
    pub width: f32,
    pub tint: Option<Color>,
    pub opacity: f32,
    /// Drawn as a faded stand-in because the user has not chosen a symbol
    pub ghost: bool,
}

/// A cropped photo filling a slot
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhotoElement {
    pub source: String,
    /// The slot the photo must fill
    pub slot: Rect,
    pub mask: MaskShape,
    /// Projected crop; `None` means cover-fit the image centred in the slot
    pub transform: Option<ImageTransform>,
    /// Safe zone of the owning panel; nothing is drawn outside it
    pub clip: Rect,
}

impl PhotoElement {
    pub fn mask_clip(&self) -> ClipShape {
        ClipShape::for_slot(self.slot, self.mask)
    }
}

/// A natural (uncropped) graphic whose longest side is scaled to `max_extent`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphicElement {
    pub source: String,
    pub anchor: Anchor,
    pub max_extent: f32,
    pub tint: Color,
    pub opacity: f32,
    /// Safe zone of the owning panel; nothing is drawn outside it
    pub clip: Rect,
}

/// Empty image slot with a dashed outline and a "+" button
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlaceholderElement {
    pub shape: MaskShape,
    pub rect: Rect,
    pub stroke: StrokeStyle,
    pub button_radius: f32,
    pub plus_length: f32,
    pub plus_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QrElement {
    pub payload: String,
    pub anchor: Anchor,
    pub size: f32,
    pub color: Color,
}

/// One drawable item of a placement plan, in paint order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Element {
    Background { rect: Rect, color: Color },
    Guide { from: Point, to: Point, stroke: StrokeStyle },
    Photo(PhotoElement),
    Graphic(GraphicElement),
    Placeholder(PlaceholderElement),
    Icon(IconElement),
    Text(TextElement),
    QrCode(QrElement),
}

/// Named anchor points of the cover wrap
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Anchors {
    /// Middle of the spine band, document vertical centre
    pub spine_center: Point,
    pub back_center: Point,
    pub front_center: Point,
}

/// Trim rectangles of the two cover panels, bleed excluded
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SafeZones {
    pub front: Rect,
    pub back: Rect,
}

/// Geometry of the bleed-inclusive document on the canvas
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoverFrame {
    /// Canvas pixels per millimetre
    pub scale: f32,
    /// Bleed-inclusive document size in millimetres
    pub document_mm: Size,
    /// Bleed-inclusive document on the canvas
    pub document: Rect,
    /// Band boundaries left to right: bleed, back start, spine start,
    /// spine end, front end, bleed
    pub x_edges: [f32; 6],
    /// Band boundaries top to bottom: bleed, cover top, cover bottom, bleed
    pub y_edges: [f32; 4],
    pub anchors: Anchors,
    pub safe_zones: SafeZones,
}

impl CoverFrame {
    /// Spine band over the full document height
    pub fn spine(&self) -> Rect {
        Rect::new(
            self.x_edges[2],
            self.document.y,
            self.x_edges[3] - self.x_edges[2],
            self.document.height,
        )
    }

    /// Visible (trimmed) cover height in pixels
    pub fn cover_height(&self) -> f32 {
        self.y_edges[2] - self.y_edges[1]
    }
}

/// Fully resolved set of absolute placements for one render pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementPlan {
    /// Size of the canvas the plan was computed for
    pub canvas: Size,
    /// `None` for an empty plan (degenerate container)
    pub frame: Option<CoverFrame>,
    pub elements: Vec<Element>,
}

impl PlacementPlan {
    pub fn empty(canvas: Size) -> Self {
        Self {
            canvas,
            frame: None,
            elements: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_none()
    }

    /// Canvas px/mm, `None` for an empty plan
    pub fn scale(&self) -> Option<f32> {
        self.frame.as_ref().map(|frame| frame.scale)
    }

    pub fn guides(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Guide { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn photos(&self) -> impl Iterator<Item = &PhotoElement> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Photo(photo) => Some(photo),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> + '_ {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(text) => Some(text),
            _ => None,
        })
    }
}

