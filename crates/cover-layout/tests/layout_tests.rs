use cover_layout::layout::*;
use cover_layout::*;

fn engine() -> CoverLayoutEngine {
    CoverLayoutEngine::default()
}

fn canvas() -> Size {
    Size::new(1200.0, 700.0)
}

fn spec_for(layout: LayoutVariant) -> CoverSpec {
    CoverSpec {
        layout,
        ..CoverSpec::default()
    }
}

fn icons(plan: &PlacementPlan) -> Vec<&IconElement> {
    plan.elements
        .iter()
        .filter_map(|element| match element {
            Element::Icon(icon) => Some(icon),
            _ => None,
        })
        .collect()
}

fn placeholders(plan: &PlacementPlan) -> Vec<&PlaceholderElement> {
    plan.elements
        .iter()
        .filter_map(|element| match element {
            Element::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-2
}

#[test]
fn test_scale_positive_for_all_positive_containers() {
    let engine = engine();
    let spec = CoverSpec::default();
    for w in [1.0, 50.0, 320.0, 800.0, 1920.0, 5000.0] {
        for h in [1.0, 45.0, 240.0, 600.0, 1080.0, 4000.0] {
            let plan = engine.layout(&spec, Size::new(w, h));
            if let Some(scale) = plan.scale() {
                assert!(scale.is_finite() && scale > 0.0);
            } else {
                // Only containers smaller than their margins are skipped
                assert!(w <= 40.0 || h <= 40.0, "{}x{}", w, h);
                assert!(plan.elements.is_empty());
            }
        }
    }
}

#[test]
fn test_guides_follow_fold_lines() {
    let plan = engine().layout(&CoverSpec::default(), canvas());
    let frame = plan.frame.clone().unwrap();
    let guides: Vec<_> = plan.guides().collect();
    assert_eq!(guides.len(), 6);
    for (i, (from, to)) in guides[..4].iter().enumerate() {
        assert_eq!(from.x, frame.x_edges[i + 1]);
        assert_eq!(to.x, frame.x_edges[i + 1]);
        assert_eq!(from.y, frame.document.y);
        assert!(approx(to.y, frame.document.bottom()));
    }
    assert_eq!(guides[4].0.y, frame.y_edges[1]);
    assert_eq!(guides[5].0.y, frame.y_edges[2]);
}

#[test]
fn test_background_covers_bleed_with_cover_color() {
    let mut spec = CoverSpec::default();
    spec.cover_color = Color::rgb(0x55, 0x6b, 0x2f);
    let plan = engine().layout(&spec, canvas());
    match &plan.elements[0] {
        Element::Background { rect, color } => {
            assert_eq!(*rect, plan.frame.as_ref().unwrap().document);
            assert_eq!(*color, spec.cover_color);
        }
        other => panic!("expected background, got {:?}", other),
    }
}

#[test]
fn test_text_icon_pair_is_vertically_centred() {
    let plan = engine().layout(&spec_for(LayoutVariant::TextIcon), canvas());
    let frame = plan.frame.as_ref().unwrap();
    let title = plan
        .texts()
        .find(|text| text.role == TextRole::Title)
        .unwrap();
    let icon = icons(&plan)[0];

    assert!(icon.ghost);
    assert_eq!(icon.opacity, constants::PLACEHOLDER_OPACITY);
    assert!(approx(icon.width, frame.mm(constants::ICON_SIZE_MM)));

    let top = title.anchor.point.y;
    let bottom = icon.anchor.point.y + icon.width / 2.0;
    assert!(approx((top + bottom) / 2.0, frame.anchors.front_center.y));
    assert!(approx(icon.anchor.point.x, frame.anchors.front_center.x));
}

#[test]
fn test_icon_positions() {
    let mut spec = spec_for(LayoutVariant::Icon);
    spec.images.icon = Some("assets/symbols/love_heart.png".to_string());
    spec.text.scale = 1.5;

    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.clone().unwrap();
    let icon = icons(&plan).into_iter().find(|icon| icon.width > frame.mm(10.0)).unwrap();
    assert_eq!(icon.anchor.point, frame.anchors.front_center);
    assert!(approx(icon.width, frame.mm(30.0)));
    assert!(!icon.ghost);

    spec.image_position = ImagePosition::Top;
    let plan = engine().layout(&spec, canvas());
    let icon = icons(&plan).into_iter().find(|icon| icon.width > frame.mm(10.0)).unwrap();
    assert!(approx(icon.anchor.point.y, frame.anchors.front_center.y - frame.mm(30.0)));

    spec.image_position = ImagePosition::BottomRight;
    let plan = engine().layout(&spec, canvas());
    let icon = icons(&plan).into_iter().find(|icon| icon.width > frame.mm(10.0)).unwrap();
    let zone = frame.safe_zones.front;
    assert!(approx(icon.anchor.point.x, zone.right() - frame.mm(20.0)));
    assert!(approx(icon.anchor.point.y, zone.bottom() - frame.mm(30.0)));
}

#[test]
fn test_spine_icon_and_text() {
    let mut spec = spec_for(LayoutVariant::Text);
    spec.images.icon = Some("assets/symbols/love_heart.png".to_string());
    spec.text.date = "2024".to_string();

    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.as_ref().unwrap();
    let spine_icon = icons(&plan)
        .into_iter()
        .find(|icon| approx(icon.width, frame.mm(constants::SPINE_ICON_WIDTH_MM)))
        .unwrap();
    assert_eq!(spine_icon.anchor.origin_y, OriginY::Bottom);
    assert!(approx(spine_icon.anchor.point.y, frame.y_edges[2] - frame.mm(15.0)));
    assert!(approx(spine_icon.anchor.point.x, frame.anchors.spine_center.x));
    assert_eq!(spine_icon.tint, Some(spec.text.color));

    let spine = plan.texts().find(|text| text.role == TextRole::Spine).unwrap();
    assert_eq!(spine.text, "THE VISUAL DIARY  \u{2022}  2024");
    assert_eq!(spine.rotation_degrees, -90.0);
    assert_eq!(spine.anchor.point, frame.anchors.spine_center);
}

#[test]
fn test_spine_symbol_toggle() {
    let mut spec = spec_for(LayoutVariant::Text);
    spec.images.icon = Some("icon.png".to_string());
    spec.spine.symbol = false;
    let plan = engine().layout(&spec, canvas());
    assert!(icons(&plan).is_empty());
}

#[test]
fn test_back_copyright_and_qr() {
    let mut spec = CoverSpec::default();
    spec.text.copyright = "(c) Studio".to_string();
    spec.qr.enabled = true;
    spec.qr.url = "https://example.com/book".to_string();

    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.as_ref().unwrap();
    let copyright = plan
        .texts()
        .find(|text| text.role == TextRole::Copyright)
        .unwrap();
    assert_eq!(copyright.opacity, 0.7);
    assert!(approx(copyright.anchor.point.x, frame.anchors.back_center.x));
    assert!(approx(copyright.anchor.point.y, frame.y_edges[2] - frame.mm(15.0)));

    let qr = plan
        .elements
        .iter()
        .find_map(|element| match element {
            Element::QrCode(qr) => Some(qr),
            _ => None,
        })
        .unwrap();
    assert_eq!(qr.payload, "https://example.com/book");
    assert!(approx(qr.size, frame.mm(15.0)));
    assert!(approx(qr.anchor.point.y, copyright.anchor.point.y - frame.mm(10.0)));

    spec.qr.url.clear();
    let plan = engine().layout(&spec, canvas());
    assert!(!plan.elements.iter().any(|e| matches!(e, Element::QrCode(_))));
}

#[test]
fn test_placeholder_title_when_lines_empty() {
    let mut spec = spec_for(LayoutVariant::Text);
    spec.text.lines[0].text.clear();
    let plan = engine().layout(&spec, canvas());
    let title = plan
        .texts()
        .find(|text| text.role == TextRole::Title)
        .unwrap();
    assert_eq!(title.text, constants::PLACEHOLDER_TITLE);
    assert_eq!(title.opacity, constants::PLACEHOLDER_OPACITY);

    let mut spec = spec_for(LayoutVariant::Magazine);
    spec.text.lines[0].text.clear();
    let plan = engine().layout(&spec, canvas());
    assert!(!plan.texts().any(|text| text.role == TextRole::Title));
}

#[test]
fn test_photo_text_slot_follows_mask_aspect() {
    let mut spec = spec_for(LayoutVariant::PhotoText);
    spec.mask = MaskSettings::rect(2.0);
    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.as_ref().unwrap();
    let slot = placeholders(&plan)[0].rect;
    assert!(approx(slot.width, frame.mm(120.0)));
    assert!(approx(slot.height, frame.mm(60.0)));
    assert!(approx(slot.center_y(), frame.anchors.front_center.y - frame.mm(20.0)));

    spec.mask = MaskSettings::rect(0.5);
    let plan = engine().layout(&spec, canvas());
    let slot = placeholders(&plan)[0].rect;
    assert!(approx(slot.width, frame.mm(40.0)));
    assert!(approx(slot.height, frame.mm(80.0)));

    spec.mask = MaskSettings::circle();
    let plan = engine().layout(&spec, canvas());
    let placeholder = placeholders(&plan)[0];
    assert_eq!(placeholder.shape, MaskShape::Circle);
    assert!(approx(placeholder.rect.width, placeholder.rect.height));
    assert!(approx(placeholder.button_radius, frame.mm(8.0)));
}

#[test]
fn test_photo_text_block_below_slot_box() {
    let spec = spec_for(LayoutVariant::PhotoText);
    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.as_ref().unwrap();
    let title = plan.texts().find(|text| text.role == TextRole::Title).unwrap();
    let expected = frame.anchors.front_center.y - frame.mm(20.0) + frame.mm(40.0) + frame.mm(15.0);
    assert!(approx(title.anchor.point.y, expected));
    assert_eq!(title.anchor.origin_y, OriginY::Top);
}

#[test]
fn test_magazine_photo_fills_safe_zone() {
    let mut spec = spec_for(LayoutVariant::Magazine);
    let plan = engine().layout(&spec, canvas());
    let zone = plan.frame.as_ref().unwrap().safe_zones.front;
    let placeholder = placeholders(&plan)[0];
    assert!(approx(placeholder.rect.width, zone.width * 0.6));
    assert!(approx(placeholder.rect.center_x(), zone.center_x()));
    assert!(approx(placeholder.rect.center_y(), zone.center_y()));

    spec.images.main = Some(ImageSlot {
        source: "photo.jpg".to_string(),
        mask: MaskShape::Rect,
        target_aspect: 1.0,
        crop: None,
    });
    let plan = engine().layout(&spec, canvas());
    let photo = plan.photos().next().unwrap();
    assert_eq!(photo.slot, zone);
    assert_eq!(photo.clip, zone);
    assert!(photo.transform.is_none());

    let title = plan.texts().find(|text| text.role == TextRole::Title).unwrap();
    assert!(title.shadow);
    assert!(approx(title.anchor.point.y, zone.center_y() - zone.height * 0.2));
}

#[test]
fn test_graphic_layout() {
    let mut spec = spec_for(LayoutVariant::Graphic);
    let plan = engine().layout(&spec, canvas());
    let frame = plan.frame.clone().unwrap();
    let placeholder = placeholders(&plan)[0];
    assert!(approx(placeholder.rect.width, frame.mm(80.0)));
    assert!(!plan.texts().any(|text| text.role == TextRole::Title));

    spec.images.main = Some(ImageSlot::natural("assets/graphics/love_heart.png"));
    spec.text.color = Color::rgb(200, 0, 0);
    let plan = engine().layout(&spec, canvas());
    let graphic = plan
        .elements
        .iter()
        .find_map(|element| match element {
            Element::Graphic(graphic) => Some(graphic),
            _ => None,
        })
        .unwrap();
    assert_eq!(graphic.tint, spec.text.color);
    assert!(approx(graphic.max_extent, frame.mm(100.0)));
    assert!(approx(graphic.anchor.point.y, frame.anchors.front_center.y - frame.mm(20.0)));

    spec.image_position = ImagePosition::BottomRight;
    let plan = engine().layout(&spec, canvas());
    let graphic = plan
        .elements
        .iter()
        .find_map(|element| match element {
            Element::Graphic(graphic) => Some(graphic),
            _ => None,
        })
        .unwrap();
    assert_eq!(graphic.anchor.origin_x, OriginX::Right);
    assert!(approx(graphic.max_extent, frame.mm(60.0)));
    assert!(approx(graphic.anchor.point.x, frame.safe_zones.front.right() - frame.mm(20.0)));
}

#[test]
fn test_crop_projected_into_slot() {
    let mut spec = spec_for(LayoutVariant::PhotoText);
    let placement = CropPlacement {
        center_offset_x: 24.0,
        center_offset_y: 0.0,
        scale: 0.3,
        rotation_degrees: 0.0,
        reference_slot_pixel_size: Size::new(240.0, 240.0),
    };
    spec.images.main = Some(ImageSlot::cropped(
        "photo.jpg",
        &CropRequest::new(1.0, MaskShape::Rect),
        placement,
    ));
    let plan = engine().layout(&spec, canvas());
    let photo = plan.photos().next().unwrap();
    let factor = photo.slot.width / 240.0;
    let transform = photo.transform.unwrap();
    assert!(approx(transform.scale, 0.3 * factor));
    assert!(approx(transform.center.x, photo.slot.center_x() + 24.0 * factor));
}
