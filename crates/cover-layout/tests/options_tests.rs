use cover_layout::*;

#[test]
fn test_default_spec_is_valid() {
    let spec = CoverSpec::default();
    assert!(spec.validate().is_ok());
    assert_eq!(spec.format, DEFAULT_FORMAT);
    assert_eq!(spec.layout, LayoutVariant::TextIcon);
    assert_eq!(spec.text.processed_lines(), vec!["THE VISUAL DIARY".to_string()]);
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut spec = CoverSpec::default();
    spec.text.scale = 0.8;
    match spec.validate() {
        Err(CoverError::Config(msg)) => assert!(msg.contains("Text scale")),
        _ => panic!("Expected Config error"),
    }

    let mut spec = CoverSpec::default();
    spec.mask.aspect = 0.0;
    assert!(spec.validate().is_err());

    let mut spec = CoverSpec::default();
    spec.format = "  ".to_string();
    assert!(spec.validate().is_err());

    let mut spec = CoverSpec::default();
    spec.images.main = Some(ImageSlot {
        source: "a.jpg".to_string(),
        mask: MaskShape::Rect,
        target_aspect: 1.0,
        crop: Some(CropPlacement {
            center_offset_x: 0.0,
            center_offset_y: 0.0,
            scale: 0.0,
            rotation_degrees: 0.0,
            reference_slot_pixel_size: layout::Size::new(240.0, 240.0),
        }),
    });
    assert!(spec.validate().is_err());
}

#[test]
fn test_partial_json_uses_defaults() {
    let json = br##"{
        "layout": "magazine",
        "cover_color": "#000000",
        "text": { "lines": [ {"text": "paris", "upper": true}, {}, {} ], "scale": 1.5 },
        "qr": { "enabled": true, "url": "https://example.com" }
    }"##;
    let spec = CoverSpec::from_json(json).unwrap();
    assert_eq!(spec.layout, LayoutVariant::Magazine);
    assert_eq!(spec.cover_color, Color::rgb(0, 0, 0));
    assert_eq!(spec.text.processed_lines(), vec!["PARIS".to_string()]);
    assert_eq!(spec.text.font, "Tenor Sans");
    assert_eq!(spec.format, "30x30");
    assert_eq!(spec.qr.payload(), Some("https://example.com"));
    assert!(spec.spine.title);
    assert!(spec.validate().is_ok());
}

#[test]
fn test_malformed_json_is_config_error() {
    assert!(matches!(
        CoverSpec::from_json(br#"{"layout": "collage"}"#),
        Err(CoverError::Config(_))
    ));
    assert!(matches!(
        CoverSpec::from_json(br#"{"cover_color": "red"}"#),
        Err(CoverError::Config(_))
    ));
}

#[tokio::test]
async fn test_load_spec_from_file() {
    use tempfile::NamedTempFile;

    let mut spec = CoverSpec::default();
    spec.layout = LayoutVariant::PhotoText;
    spec.mask = MaskSettings::circle();
    spec.text.date = "2024".to_string();

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), serde_json::to_vec(&spec).unwrap()).unwrap();

    let loaded = CoverSpec::load(temp.path()).await.unwrap();
    assert_eq!(loaded, spec);
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CoverSpec::load(dir.path().join("missing.json")).await;
    assert!(matches!(result, Err(CoverError::Io(_))));
}

#[tokio::test]
async fn test_load_catalog() {
    use tempfile::NamedTempFile;

    let json = br##"{
        "formats": {
            "30x30": {"width_mm": 303, "height_mm": 303, "spine_mm": 20, "bleed_mm": 15},
            "30x20": {"width_mm": 303, "height_mm": 203, "spine_mm": 18, "bleed_mm": 15}
        },
        "palettes": { "Kinfolk - Cinema": [ {"bg": "#556B2F", "text": "#F5F5DC"} ] },
        "assets": { "symbols": { "Love symbols": ["love_heart.png"] } }
    }"##;
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), json).unwrap();

    let catalog = Catalog::load(temp.path()).await.unwrap();
    assert_eq!(catalog.format("30x20").unwrap().spine_mm, 18.0);
    assert_eq!(catalog.palette("Kinfolk - Cinema").unwrap().len(), 1);
    let symbols: Vec<_> = catalog.collections(catalog::AssetKind::Symbols).collect();
    assert_eq!(symbols.len(), 1);
    assert_eq!(symbols[0].1, ["love_heart.png".to_string()]);
}

#[tokio::test]
async fn test_catalog_without_default_format_is_rejected() {
    use tempfile::NamedTempFile;

    let json = br#"{ "formats": { "20x20": {"width_mm": 203, "height_mm": 203, "spine_mm": 20, "bleed_mm": 15} } }"#;
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), json).unwrap();
    assert!(matches!(
        Catalog::load(temp.path()).await,
        Err(CoverError::Config(_))
    ));
}
