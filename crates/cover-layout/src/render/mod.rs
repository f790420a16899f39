//! Renderer boundary
//!
//! Layout produces a [`PlacementPlan`]; this module walks it and issues calls
//! against any backend implementing [`Renderer`]:
//! - Shapes (background, guides, placeholder outlines and buttons)
//! - Text and QR codes
//! - Asynchronously loaded images with their clip regions

mod raster;

pub use raster::RasterRenderer;

use crate::export::ExportSettings;
use crate::layout::{
    ClipShape, Element, GraphicElement, IconElement, ImageTransform, PhotoElement,
    PlaceholderElement, PlacementPlan, Point, QrElement, Rect, Size, StrokeStyle, TextElement,
};
use crate::types::{Color, CoverError, MaskShape, Result};
use std::future::Future;
use std::path::Path;

/// Geometry of a drawn shape, in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle { center: Point, radius: f32 },
    Line { from: Point, to: Point },
}

/// Fill and outline of a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
    pub opacity: f32,
}

impl ShapeStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            opacity: 1.0,
        }
    }

    pub fn stroked(stroke: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(stroke),
            opacity: stroke.opacity,
        }
    }
}

/// Absolute placement of a loaded image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub transform: ImageTransform,
    /// Replace the image colour, keeping its alpha
    pub tint: Option<Color>,
    pub opacity: f32,
}

/// Handle of a placed image, used to attach clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// A 2D scene backend
pub trait Renderer {
    /// Decoded image handle
    type Image: Send;

    /// Drop all content and resize the canvas
    fn clear(&mut self, canvas: Size);

    fn create_shape(&mut self, shape: Shape, style: ShapeStyle);

    fn create_text(&mut self, text: &TextElement);

    fn create_qr(&mut self, qr: &QrElement);

    /// Load an image by source reference; `None` if it cannot be loaded
    fn load_image(&self, source: &str) -> impl Future<Output = Option<Self::Image>> + Send;

    /// Natural pixel size of a loaded image
    fn image_size(&self, image: &Self::Image) -> Size;

    fn place_image(&mut self, image: Self::Image, placement: ImagePlacement) -> ImageId;

    /// Restrict a placed image to `clip`; multiple clips intersect
    fn apply_clip(&mut self, image: ImageId, clip: ClipShape);

    /// Rasterise the current content and encode it
    fn export_raster(&self, settings: &ExportSettings) -> Result<Vec<u8>>;
}

/// Outcome of walking a plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub drawn: usize,
    /// Sources of images that could not be loaded
    pub skipped: Vec<String>,
}

/// Issue renderer calls for every element of `plan`, in order.
///
/// Images that fail to load are skipped with a warning; the rest of the plan
/// is still drawn. An empty plan just clears the canvas.
pub async fn render_plan<R: Renderer>(plan: &PlacementPlan, renderer: &mut R) -> RenderReport {
    renderer.clear(plan.canvas);
    let mut report = RenderReport::default();

    for element in &plan.elements {
        let drawn = match element {
            Element::Background { rect, color } => {
                renderer.create_shape(Shape::Rect(*rect), ShapeStyle::filled(*color));
                true
            }
            Element::Guide { from, to, stroke } => {
                renderer.create_shape(Shape::Line { from: *from, to: *to }, ShapeStyle::stroked(*stroke));
                true
            }
            Element::Placeholder(placeholder) => {
                draw_placeholder(renderer, placeholder);
                true
            }
            Element::Text(text) => {
                renderer.create_text(text);
                true
            }
            Element::QrCode(qr) => {
                renderer.create_qr(qr);
                true
            }
            Element::Icon(icon) => draw_icon(renderer, icon).await,
            Element::Graphic(graphic) => draw_graphic(renderer, graphic).await,
            Element::Photo(photo) => draw_photo(renderer, photo).await,
        };

        if drawn {
            report.drawn += 1;
        } else if let Some(source) = image_source(element) {
            log::warn!("Skipping image {}: it could not be loaded", source);
            report.skipped.push(source.to_string());
        }
    }
    report
}

/// Render `plan` with a [`RasterRenderer`] and encode it.
///
/// Rasterisation and encoding run on the blocking pool.
///
/// # Arguments
/// * `plan` - Plan to draw; an empty plan is an error
/// * `base_dir` - Directory that relative image sources resolve against
/// * `settings` - Output format, multiplier and region
pub async fn export_plan(
    plan: &PlacementPlan,
    base_dir: &Path,
    settings: ExportSettings,
) -> Result<(Vec<u8>, RenderReport)> {
    if plan.is_empty() {
        return Err(CoverError::EmptyPlan);
    }
    let mut renderer = RasterRenderer::new(base_dir);
    let report = render_plan(plan, &mut renderer).await;

    let bytes = tokio::task::spawn_blocking(move || renderer.export_raster(&settings)).await??;
    let (width, height) = settings.output_size(plan.canvas);
    log::info!(
        "Exported {}x{} {} ({} bytes, {} images skipped)",
        width,
        height,
        settings.format.extension(),
        bytes.len(),
        report.skipped.len()
    );
    Ok((bytes, report))
}

fn image_source(element: &Element) -> Option<&str> {
    match element {
        Element::Icon(icon) => Some(&icon.source),
        Element::Graphic(graphic) => Some(&graphic.source),
        Element::Photo(photo) => Some(&photo.source),
        _ => None,
    }
}

fn draw_placeholder<R: Renderer>(renderer: &mut R, placeholder: &PlaceholderElement) {
    let rect = placeholder.rect;
    let outline = match placeholder.shape {
        MaskShape::Rect => Shape::Rect(rect),
        MaskShape::Circle => Shape::Circle {
            center: rect.center(),
            radius: rect.width / 2.0,
        },
    };
    renderer.create_shape(outline, ShapeStyle::stroked(placeholder.stroke));

    let center = rect.center();
    renderer.create_shape(
        Shape::Circle {
            center,
            radius: placeholder.button_radius,
        },
        ShapeStyle::filled(Color::WHITE),
    );
    let bar = placeholder.plus_length;
    for size in [
        Size::new(placeholder.plus_width, bar),
        Size::new(bar, placeholder.plus_width),
    ] {
        renderer.create_shape(
            Shape::Rect(Rect::from_center(center, size)),
            ShapeStyle::filled(Color::BUTTON_GLYPH),
        );
    }
}

async fn draw_icon<R: Renderer>(renderer: &mut R, icon: &IconElement) -> bool {
    let Some(image) = renderer.load_image(&icon.source).await else {
        return false;
    };
    let natural = renderer.image_size(&image);
    if natural.is_empty() {
        return false;
    }
    let scale = icon.width / natural.width;
    let bounds = icon.anchor.place(natural.scale(scale));
    renderer.place_image(
        image,
        ImagePlacement {
            transform: ImageTransform {
                center: bounds.center(),
                scale,
                rotation_degrees: 0.0,
            },
            tint: icon.tint,
            opacity: icon.opacity,
        },
    );
    true
}

async fn draw_graphic<R: Renderer>(renderer: &mut R, graphic: &GraphicElement) -> bool {
    let Some(image) = renderer.load_image(&graphic.source).await else {
        return false;
    };
    let natural = renderer.image_size(&image);
    if natural.is_empty() {
        return false;
    }
    let scale = graphic.max_extent / natural.width.max(natural.height);
    let bounds = graphic.anchor.place(natural.scale(scale));
    let id = renderer.place_image(
        image,
        ImagePlacement {
            transform: ImageTransform {
                center: bounds.center(),
                scale,
                rotation_degrees: 0.0,
            },
            tint: Some(graphic.tint),
            opacity: graphic.opacity,
        },
    );
    renderer.apply_clip(id, ClipShape::Rect(graphic.clip));
    true
}

/// Transform filling `slot` with an image of `natural` size, centred
pub fn cover_fit(slot: &Rect, natural: Size) -> ImageTransform {
    ImageTransform {
        center: slot.center(),
        scale: (slot.width / natural.width).max(slot.height / natural.height),
        rotation_degrees: 0.0,
    }
}

async fn draw_photo<R: Renderer>(renderer: &mut R, photo: &PhotoElement) -> bool {
    let Some(image) = renderer.load_image(&photo.source).await else {
        return false;
    };
    let natural = renderer.image_size(&image);
    if natural.is_empty() {
        return false;
    }
    let transform = photo
        .transform
        .unwrap_or_else(|| cover_fit(&photo.slot, natural));
    let id = renderer.place_image(
        image,
        ImagePlacement {
            transform,
            tint: None,
            opacity: 1.0,
        },
    );
    renderer.apply_clip(id, ClipShape::Rect(photo.clip));
    renderer.apply_clip(id, photo.mask_clip());
    true
}
