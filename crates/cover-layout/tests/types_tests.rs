use cover_layout::*;

#[test]
fn test_document_size_for_all_formats() {
    let catalog = Catalog::default();
    for (name, format) in &catalog.formats {
        let expected_w = 2.0 * format.width_mm + format.spine_mm + 2.0 * format.bleed_mm;
        let expected_h = format.height_mm + 2.0 * format.bleed_mm;
        assert_eq!(format.document_width_mm(), expected_w, "{}", name);
        assert_eq!(format.document_height_mm(), expected_h, "{}", name);
    }
}

#[test]
fn test_scenario_document_size() {
    let format = CoverFormat::new(303.0, 303.0, 20.0, 15.0).unwrap();
    assert_eq!(format.document_width_mm(), 656.0);
    assert_eq!(format.document_height_mm(), 333.0);
    assert_eq!(format.panel_aspect(), 1.0);
}

#[test]
fn test_format_rejects_non_positive_lengths() {
    assert!(CoverFormat::new(0.0, 303.0, 20.0, 15.0).is_none());
    assert!(CoverFormat::new(303.0, -1.0, 20.0, 15.0).is_none());
    assert!(CoverFormat::new(303.0, 303.0, f32::NAN, 15.0).is_none());
    assert!(CoverFormat::new(303.0, 303.0, 20.0, 0.0).is_none());
}

#[test]
fn test_color_hex() {
    assert_eq!(Color::from_hex("#1a1a1a"), Some(Color::INK));
    assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
    assert_eq!(
        Color::from_hex("#00000080"),
        Some(Color([0, 0, 0, 0x80]))
    );
    assert_eq!(Color::from_hex("#12345"), None);
    assert_eq!(Color::from_hex("#gggggg"), None);
    assert_eq!(Color::INK.to_hex(), "#1A1A1A");
    assert_eq!(Color([1, 2, 3, 4]).to_hex(), "#01020304");
    assert!("nope".parse::<Color>().is_err());
}

#[test]
fn test_layout_variant_names() {
    for variant in LayoutVariant::ALL {
        assert_eq!(variant.name().parse::<LayoutVariant>().unwrap(), variant);
    }
    assert!("collage".parse::<LayoutVariant>().is_err());
    assert_eq!(LayoutVariant::default(), LayoutVariant::TextIcon);
    assert!(LayoutVariant::Magazine.uses_crop());
    assert!(!LayoutVariant::Graphic.uses_crop());
    assert!(LayoutVariant::Graphic.has_main_image());
}

#[test]
fn test_color_serde_as_hex() {
    let pair: ColorPair = serde_json::from_str(r##"{"bg": "#556B2F", "text": "#F5F5DC"}"##).unwrap();
    assert_eq!(pair.background, Color::rgb(0x55, 0x6b, 0x2f));
    let json = serde_json::to_string(&pair).unwrap();
    assert_eq!(json, r##"{"background":"#556B2F","foreground":"#F5F5DC"}"##);
}
