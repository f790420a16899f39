//! Spine, back and front cover placements
//!
//! Offsets are physical millimetres converted through the frame scale, so
//! every placement scales uniformly with the viewport.

use crate::constants::*;
use crate::options::CoverSpec;
use crate::types::{ImagePosition, LayoutVariant, MaskShape};

use super::{
    Anchor, CoverFrame, Element, GraphicElement, IconElement, LayoutStyle, PhotoElement,
    PlaceholderElement, Point, QrElement, Rect, Size, TextBlock, TextBlockKind, TextElement,
    TextRole, magazine_title,
};

// =============================================================================
// Spine and Back
// =============================================================================

/// Text shown along the spine: title lines joined by spaces and/or the date,
/// separated by a bullet. `None` when nothing is enabled or there is no text.
pub fn spine_text(spec: &CoverSpec) -> Option<String> {
    let mut parts = Vec::new();
    if spec.spine.title {
        let lines = spec.text.processed_lines();
        if !lines.is_empty() {
            parts.push(lines.join(" "));
        }
    }
    if spec.spine.date && !spec.text.date.is_empty() {
        parts.push(spec.text.date.clone());
    }
    (!parts.is_empty()).then(|| parts.join(SPINE_SEPARATOR))
}

pub fn spine_elements(frame: &CoverFrame, spec: &CoverSpec) -> Vec<Element> {
    let mut elements = Vec::new();
    let spine_x = frame.anchors.spine_center.x;

    if spec.spine.symbol
        && let Some(icon) = &spec.images.icon
    {
        let bottom = frame.y_edges[2] - frame.mm(BOTTOM_INSET_MM);
        elements.push(Element::Icon(IconElement {
            source: icon.clone(),
            anchor: Anchor::bottom(Point::new(spine_x, bottom)),
            width: frame.mm(SPINE_ICON_WIDTH_MM),
            tint: Some(spec.text.color),
            opacity: 1.0,
            ghost: false,
        }));
    }

    if let Some(text) = spine_text(spec) {
        elements.push(Element::Text(TextElement {
            role: TextRole::Spine,
            text,
            font_family: spec.text.font.clone(),
            font_size: frame.mm(SPINE_FONT_MM),
            line_height: 1.0,
            letter_spacing: SPINE_LETTER_SPACING,
            color: spec.text.color,
            opacity: 1.0,
            anchor: Anchor::center(frame.anchors.spine_center),
            rotation_degrees: -90.0,
            shadow: false,
        }));
    }
    elements
}

pub fn back_elements(frame: &CoverFrame, spec: &CoverSpec) -> Vec<Element> {
    let mut elements = Vec::new();
    let x = frame.anchors.back_center.x;
    let bottom = frame.y_edges[2] - frame.mm(BOTTOM_INSET_MM);

    if !spec.text.copyright.is_empty() {
        elements.push(Element::Text(TextElement {
            role: TextRole::Copyright,
            text: spec.text.copyright.clone(),
            font_family: spec.text.font.clone(),
            font_size: frame.mm(COPYRIGHT_FONT_MM),
            line_height: 1.0,
            letter_spacing: COPYRIGHT_LETTER_SPACING,
            color: spec.text.color,
            opacity: COPYRIGHT_OPACITY,
            anchor: Anchor::bottom(Point::new(x, bottom)),
            rotation_degrees: 0.0,
            shadow: false,
        }));
    }

    if let Some(payload) = spec.qr.payload() {
        elements.push(Element::QrCode(QrElement {
            payload: payload.to_string(),
            anchor: Anchor::bottom(Point::new(x, bottom - frame.mm(QR_GAP_MM))),
            size: frame.mm(QR_SIZE_MM),
            color: spec.text.color,
        }));
    }
    elements
}

// =============================================================================
// Front Cover
// =============================================================================

/// Front cover elements for the spec's layout variant
pub fn front_elements(frame: &CoverFrame, spec: &CoverSpec, style: &LayoutStyle) -> Vec<Element> {
    match spec.layout {
        LayoutVariant::Text => {
            TextBlock::new(&spec.text, TextBlockKind::Regular, frame.scale)
                .place_center(frame.anchors.front_center)
        }
        LayoutVariant::Icon => vec![front_icon(frame, spec)],
        LayoutVariant::TextIcon => text_with_icon(frame, spec),
        LayoutVariant::Graphic => graphic(frame, spec, style),
        LayoutVariant::PhotoText => photo_with_text(frame, spec, style),
        LayoutVariant::Magazine => magazine(frame, spec, style),
    }
}

/// Icon of the icon-only layout, honouring the image position
fn front_icon(frame: &CoverFrame, spec: &CoverSpec) -> Element {
    let center = frame.anchors.front_center;
    let point = match spec.image_position {
        ImagePosition::Center => center,
        ImagePosition::Top => center.offset(0.0, -frame.mm(TOP_POSITION_RAISE_MM)),
        ImagePosition::BottomRight => {
            let zone = frame.safe_zones.front;
            Point::new(
                zone.right() - frame.mm(BOTTOM_RIGHT_INSET_X_MM),
                zone.bottom() - frame.mm(BOTTOM_RIGHT_INSET_Y_MM),
            )
        }
    };
    icon_at(spec, point, frame.mm(ICON_SIZE_MM) * spec.text.scale)
}

/// The chosen symbol, or the default symbol as a faded ghost
fn icon_at(spec: &CoverSpec, point: Point, width: f32) -> Element {
    let (source, ghost) = match &spec.images.icon {
        Some(icon) => (icon.clone(), false),
        None => (DEFAULT_ICON_SOURCE.to_string(), true),
    };
    Element::Icon(IconElement {
        source,
        anchor: Anchor::center(point),
        width,
        tint: Some(spec.text.color),
        opacity: if ghost { PLACEHOLDER_OPACITY } else { 1.0 },
        ghost,
    })
}

/// Compact text block stacked above a fixed-size icon, centred as a pair
fn text_with_icon(frame: &CoverFrame, spec: &CoverSpec) -> Vec<Element> {
    let center = frame.anchors.front_center;
    let block = TextBlock::new(&spec.text, TextBlockKind::Compact, frame.scale);
    let icon_size = frame.mm(ICON_SIZE_MM);
    let gap = frame.mm(TEXT_ICON_GAP_MM);

    let total = block.height() + gap + icon_size;
    let top = center.y - total / 2.0;

    let mut elements = block.place_top(center.x, top);
    let icon_center = Point::new(center.x, top + block.height() + gap + icon_size / 2.0);
    elements.push(icon_at(spec, icon_center, icon_size));
    elements
}

fn graphic(frame: &CoverFrame, spec: &CoverSpec, style: &LayoutStyle) -> Vec<Element> {
    let center = frame
        .anchors
        .front_center
        .offset(0.0, -frame.mm(FEATURE_RAISE_MM));

    let Some(main) = &spec.images.main else {
        let side = frame.mm(GRAPHIC_PLACEHOLDER_MM);
        return vec![placeholder(frame, style, MaskShape::Rect, center, Size::new(side, side))];
    };

    let zone = frame.safe_zones.front;
    let extent = frame.mm(GRAPHIC_EXTENT_MM) * spec.text.scale;
    let (anchor, max_extent) = match spec.image_position {
        ImagePosition::Center => (Anchor::center(center), extent),
        ImagePosition::Top => (
            Anchor::center(center.offset(0.0, -frame.mm(TOP_POSITION_RAISE_MM))),
            extent,
        ),
        ImagePosition::BottomRight => (
            Anchor::bottom_right(Point::new(
                zone.right() - frame.mm(BOTTOM_RIGHT_INSET_X_MM),
                zone.bottom() - frame.mm(BOTTOM_RIGHT_INSET_Y_MM),
            )),
            extent * style.bottom_right_graphic_scale,
        ),
    };

    vec![Element::Graphic(GraphicElement {
        source: main.source.clone(),
        anchor,
        max_extent,
        tint: spec.text.color,
        opacity: 1.0,
        clip: zone,
    })]
}

/// Photo slot of the photo-plus-text layout: the largest rectangle with the
/// mask aspect inside the slot box, sharing the box centre.
pub fn photo_slot(frame: &CoverFrame, spec: &CoverSpec) -> Rect {
    let center = frame
        .anchors
        .front_center
        .offset(0.0, -frame.mm(FEATURE_RAISE_MM));
    let bounds = Size::new(frame.mm(PHOTO_SLOT_WIDTH_MM), frame.mm(PHOTO_SLOT_HEIGHT_MM));
    Rect::from_center(center, bounds.fit_aspect(spec.mask.effective_aspect()))
}

fn photo_with_text(frame: &CoverFrame, spec: &CoverSpec, style: &LayoutStyle) -> Vec<Element> {
    let slot = photo_slot(frame, spec);
    let mut elements = vec![photo_or_placeholder(frame, spec, style, slot, spec.mask.shape, slot.size())];

    let box_bottom = slot.center_y() + frame.mm(PHOTO_SLOT_HEIGHT_MM) / 2.0;
    let block = TextBlock::new(&spec.text, TextBlockKind::Compact, frame.scale);
    elements.extend(block.place_top(slot.center_x(), box_bottom + frame.mm(PHOTO_TEXT_GAP_MM)));
    elements
}

fn magazine(frame: &CoverFrame, spec: &CoverSpec, style: &LayoutStyle) -> Vec<Element> {
    let zone = frame.safe_zones.front;
    let empty_size = zone.size().scale(MAGAZINE_PLACEHOLDER_RATIO);
    let mut elements = vec![photo_or_placeholder(frame, spec, style, zone, MaskShape::Rect, empty_size)];

    let top = zone.center_y() - zone.height * MAGAZINE_TITLE_RAISE;
    elements.extend(magazine_title(&spec.text, frame.scale, zone.center_x(), top));
    elements
}

/// The main photo filling `slot`, or a placeholder of `empty_size` centred on it
fn photo_or_placeholder(
    frame: &CoverFrame,
    spec: &CoverSpec,
    style: &LayoutStyle,
    slot: Rect,
    mask: MaskShape,
    empty_size: Size,
) -> Element {
    match &spec.images.main {
        Some(main) => Element::Photo(PhotoElement {
            source: main.source.clone(),
            slot,
            mask,
            transform: main.crop.map(|crop| crop.project(&slot)),
            clip: frame.safe_zones.front,
        }),
        None => placeholder(frame, style, mask, slot.center(), empty_size),
    }
}

fn placeholder(
    frame: &CoverFrame,
    style: &LayoutStyle,
    shape: MaskShape,
    center: Point,
    size: Size,
) -> Element {
    let size = match shape {
        MaskShape::Rect => size,
        MaskShape::Circle => Size::new(size.width, size.width),
    };
    let button_radius = frame.mm(PLACEHOLDER_BUTTON_RADIUS_MM);
    Element::Placeholder(PlaceholderElement {
        shape,
        rect: Rect::from_center(center, size),
        stroke: style.placeholder,
        button_radius,
        plus_length: button_radius * PLACEHOLDER_PLUS_RATIO,
        plus_width: frame.mm(PLACEHOLDER_PLUS_WIDTH_MM),
    })
}
