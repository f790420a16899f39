//! Software raster backend on top of the `image` crate
//!
//! Calls are recorded into a display list in canvas pixels and only
//! rasterised at export time, so one scene can be exported at any multiplier.
//! Shapes and images are drawn; text and QR codes are recorded but left to a
//! typesetting backend.

use super::{ImageId, ImagePlacement, Renderer, Shape, ShapeStyle};
use crate::export::{ExportFormat, ExportSettings};
use crate::layout::{ClipShape, Point, QrElement, Rect, Size, StrokeStyle, TextElement};
use crate::types::{Color, CoverError, Result};
use image::{ImageEncoder, RgbaImage};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Largest raster the backend will allocate
const MAX_EXPORT_PIXELS: u64 = 400_000_000;

#[derive(Debug, Clone)]
enum DisplayItem {
    Shape(Shape, ShapeStyle),
    Image {
        image: Arc<RgbaImage>,
        placement: ImagePlacement,
        clips: Vec<ClipShape>,
    },
    Text(TextElement),
    Qr(QrElement),
}

/// Display-list renderer that rasterises with the `image` crate
#[derive(Debug, Clone)]
pub struct RasterRenderer {
    base_dir: PathBuf,
    canvas: Size,
    items: Vec<DisplayItem>,
}

impl RasterRenderer {
    /// Renderer resolving relative image sources against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            canvas: Size::default(),
            items: Vec::new(),
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Recorded text elements, in paint order
    pub fn texts(&self) -> impl Iterator<Item = &TextElement> + '_ {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn qr_codes(&self) -> impl Iterator<Item = &QrElement> + '_ {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Qr(qr) => Some(qr),
            _ => None,
        })
    }

    pub fn image_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, DisplayItem::Image { .. }))
            .count()
    }

    fn resolve(&self, source: &str) -> PathBuf {
        let path = Path::new(source);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Rasterise the display list without encoding it
    pub fn rasterize(&self, settings: &ExportSettings) -> Result<RgbaImage> {
        if self.canvas.is_empty() {
            return Err(CoverError::EmptyPlan);
        }
        if !settings.multiplier.is_finite() || settings.multiplier <= 0.0 {
            return Err(CoverError::Render(format!(
                "Invalid export multiplier {}",
                settings.multiplier
            )));
        }
        let (width, height) = settings.output_size(self.canvas);
        if u64::from(width) * u64::from(height) > MAX_EXPORT_PIXELS {
            return Err(CoverError::Render(format!(
                "Export of {}x{} pixels is too large",
                width, height
            )));
        }

        let origin = settings
            .region
            .map(|region| Point::new(region.x, region.y))
            .unwrap_or_default();
        let mut surface = Surface {
            pixels: RgbaImage::new(width, height),
            origin,
            multiplier: settings.multiplier,
        };

        for item in &self.items {
            match item {
                DisplayItem::Shape(shape, style) => surface.draw_shape(shape, style),
                DisplayItem::Image {
                    image,
                    placement,
                    clips,
                } => surface.draw_image(image, placement, clips),
                DisplayItem::Text(_) | DisplayItem::Qr(_) => {}
            }
        }
        Ok(surface.pixels)
    }
}

impl Renderer for RasterRenderer {
    type Image = Arc<RgbaImage>;

    fn clear(&mut self, canvas: Size) {
        self.canvas = canvas;
        self.items.clear();
    }

    fn create_shape(&mut self, shape: Shape, style: ShapeStyle) {
        self.items.push(DisplayItem::Shape(shape, style));
    }

    fn create_text(&mut self, text: &TextElement) {
        self.items.push(DisplayItem::Text(text.clone()));
    }

    fn create_qr(&mut self, qr: &QrElement) {
        self.items.push(DisplayItem::Qr(qr.clone()));
    }

    fn load_image(&self, source: &str) -> impl Future<Output = Option<Self::Image>> + Send {
        let path = self.resolve(source);
        async move {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Failed to read image {}: {}", path.display(), e);
                    return None;
                }
            };
            let decoded =
                tokio::task::spawn_blocking(move || image::load_from_memory(&bytes).map(|i| i.to_rgba8()))
                    .await;
            match decoded {
                Ok(Ok(image)) => Some(Arc::new(image)),
                Ok(Err(e)) => {
                    log::warn!("Failed to decode image {}: {}", path.display(), e);
                    None
                }
                Err(e) => {
                    log::warn!("Image decode task failed for {}: {}", path.display(), e);
                    None
                }
            }
        }
    }

    fn image_size(&self, image: &Self::Image) -> Size {
        Size::new(image.width() as f32, image.height() as f32)
    }

    fn place_image(&mut self, image: Self::Image, placement: ImagePlacement) -> ImageId {
        self.items.push(DisplayItem::Image {
            image,
            placement,
            clips: Vec::new(),
        });
        ImageId(self.items.len() - 1)
    }

    fn apply_clip(&mut self, image: ImageId, clip: ClipShape) {
        match self.items.get_mut(image.0) {
            Some(DisplayItem::Image { clips, .. }) => clips.push(clip),
            _ => log::warn!("Clip applied to unknown image {:?}", image),
        }
    }

    fn export_raster(&self, settings: &ExportSettings) -> Result<Vec<u8>> {
        let pixels = self.rasterize(settings)?;
        encode(&pixels, settings)
    }
}

/// Encode a raster as PNG (with alpha) or JPEG (flattened onto white)
pub fn encode(pixels: &RgbaImage, settings: &ExportSettings) -> Result<Vec<u8>> {
    let (width, height) = pixels.dimensions();
    let mut buf = Vec::new();
    match settings.format {
        ExportFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut buf);
            encoder.write_image(pixels.as_raw(), width, height, image::ColorType::Rgba8.into())?;
        }
        ExportFormat::Jpeg => {
            let flat = image::RgbImage::from_fn(width, height, |x, y| {
                let [r, g, b, a] = pixels.get_pixel(x, y).0;
                let a = f32::from(a) / 255.0;
                let over_white = |c: u8| (f32::from(c) * a + 255.0 * (1.0 - a)).round() as u8;
                image::Rgb([over_white(r), over_white(g), over_white(b)])
            });
            let quality = (settings.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality);
            encoder.write_image(flat.as_raw(), width, height, image::ColorType::Rgb8.into())?;
        }
    }
    Ok(buf)
}

// =============================================================================
// Rasterisation
// =============================================================================

/// Output raster plus the mapping from canvas pixels to output pixels
struct Surface {
    pixels: RgbaImage,
    origin: Point,
    multiplier: f32,
}

impl Surface {
    /// Canvas position of an output pixel centre
    fn canvas_point(&self, x: u32, y: u32) -> Point {
        Point::new(
            self.origin.x + (x as f32 + 0.5) / self.multiplier,
            self.origin.y + (y as f32 + 0.5) / self.multiplier,
        )
    }

    /// Output pixel range `[x0, x1) x [y0, y1)` covering a canvas rectangle
    fn pixel_bounds(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let (width, height) = self.pixels.dimensions();
        let to_px = |v: f32, origin: f32, limit: u32| {
            ((v - origin) * self.multiplier).clamp(0.0, limit as f32)
        };
        let x0 = to_px(rect.x, self.origin.x, width).floor() as u32;
        let y0 = to_px(rect.y, self.origin.y, height).floor() as u32;
        let x1 = to_px(rect.right(), self.origin.x, width).ceil() as u32;
        let y1 = to_px(rect.bottom(), self.origin.y, height).ceil() as u32;
        (x1 > x0 && y1 > y0).then_some((x0, y0, x1, y1))
    }

    /// Source-over blend of a straight-alpha colour
    fn blend(&mut self, x: u32, y: u32, color: [u8; 4], opacity: f32) {
        let src_a = f32::from(color[3]) / 255.0 * opacity.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        let dst_a = f32::from(dst.0[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for i in 0..3 {
            let c = (f32::from(color[i]) * src_a + f32::from(dst.0[i]) * dst_a * (1.0 - src_a)) / out_a;
            dst.0[i] = c.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = (out_a * 255.0).round() as u8;
    }

    /// Visit every output pixel whose centre falls inside `bounds`
    fn for_each_pixel(&mut self, bounds: &Rect, mut visit: impl FnMut(&mut Self, u32, u32, Point)) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(bounds) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let p = self.canvas_point(x, y);
                visit(self, x, y, p);
            }
        }
    }

    fn draw_shape(&mut self, shape: &Shape, style: &ShapeStyle) {
        if let Some(fill) = style.fill {
            match *shape {
                Shape::Rect(rect) => self.for_each_pixel(&rect, |s, x, y, p| {
                    if rect.contains_point(p) {
                        s.blend(x, y, fill.0, style.opacity);
                    }
                }),
                Shape::Circle { center, radius } => {
                    let clip = ClipShape::Circle { center, radius };
                    self.for_each_pixel(&clip.bounds(), |s, x, y, p| {
                        if clip.contains(p) {
                            s.blend(x, y, fill.0, style.opacity);
                        }
                    });
                }
                Shape::Line { .. } => {}
            }
        }

        if let Some(stroke) = style.stroke {
            match *shape {
                Shape::Rect(rect) => {
                    let corners = [
                        Point::new(rect.x, rect.y),
                        Point::new(rect.right(), rect.y),
                        Point::new(rect.right(), rect.bottom()),
                        Point::new(rect.x, rect.bottom()),
                    ];
                    for i in 0..4 {
                        self.stroke_line(corners[i], corners[(i + 1) % 4], &stroke, style.opacity);
                    }
                }
                Shape::Circle { center, radius } => {
                    self.stroke_circle(center, radius, &stroke, style.opacity)
                }
                Shape::Line { from, to } => self.stroke_line(from, to, &stroke, style.opacity),
            }
        }
    }

    /// Half the stroke width, never thinner than half an output pixel
    fn half_width(&self, stroke: &StrokeStyle) -> f32 {
        (stroke.width / 2.0).max(0.5 / self.multiplier)
    }

    fn stroke_line(&mut self, from: Point, to: Point, stroke: &StrokeStyle, opacity: f32) {
        let half = self.half_width(stroke);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length_sq = dx * dx + dy * dy;
        let length = length_sq.sqrt();
        let bounds = Rect::new(
            from.x.min(to.x) - half,
            from.y.min(to.y) - half,
            dx.abs() + 2.0 * half,
            dy.abs() + 2.0 * half,
        );
        let color = stroke.color.0;
        self.for_each_pixel(&bounds, |s, x, y, p| {
            let t = if length_sq > 0.0 {
                (((p.x - from.x) * dx + (p.y - from.y) * dy) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let nearest = Point::new(from.x + t * dx, from.y + t * dy);
            let distance = ((p.x - nearest.x).powi(2) + (p.y - nearest.y).powi(2)).sqrt();
            if distance <= half && dash_on(t * length, stroke.dash) {
                s.blend(x, y, color, opacity);
            }
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, stroke: &StrokeStyle, opacity: f32) {
        let half = self.half_width(stroke);
        let outer = radius + half;
        let bounds = Rect::from_center(center, Size::new(outer * 2.0, outer * 2.0));
        let color = stroke.color.0;
        self.for_each_pixel(&bounds, |s, x, y, p| {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            let distance = (dx * dx + dy * dy).sqrt();
            let arc = (dy.atan2(dx) + std::f32::consts::PI) * radius;
            if (distance - radius).abs() <= half && dash_on(arc, stroke.dash) {
                s.blend(x, y, color, opacity);
            }
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, placement: &ImagePlacement, clips: &[ClipShape]) {
        let transform = placement.transform;
        if !transform.scale.is_finite() || transform.scale <= 0.0 {
            return;
        }
        let (iw, ih) = (image.width() as f32, image.height() as f32);
        let theta = transform.rotation_degrees.to_radians();
        let (sin, cos) = theta.sin_cos();

        let w = iw * transform.scale;
        let h = ih * transform.scale;
        let extent = Size::new(
            (w * cos).abs() + (h * sin).abs(),
            (w * sin).abs() + (h * cos).abs(),
        );
        let mut bounds = Rect::from_center(transform.center, extent);
        for clip in clips {
            match bounds.intersection(&clip.bounds()) {
                Some(clipped) => bounds = clipped,
                None => return,
            }
        }

        self.for_each_pixel(&bounds, |s, x, y, p| {
            if !clips.iter().all(|clip| clip.contains(p)) {
                return;
            }
            let dx = p.x - transform.center.x;
            let dy = p.y - transform.center.y;
            let sx = (dx * cos + dy * sin) / transform.scale + iw / 2.0;
            let sy = (-dx * sin + dy * cos) / transform.scale + ih / 2.0;
            if sx < 0.0 || sy < 0.0 || sx >= iw || sy >= ih {
                return;
            }
            let mut color = image.get_pixel(sx as u32, sy as u32).0;
            if let Some(Color([r, g, b, _])) = placement.tint {
                color = [r, g, b, color[3]];
            }
            s.blend(x, y, color, placement.opacity);
        });
    }
}

/// Whether position `along` a stroke falls on a dash
fn dash_on(along: f32, dash: Option<[f32; 2]>) -> bool {
    match dash {
        Some([on, off]) if on + off > 0.0 => along.rem_euclid(on + off) < on,
        _ => true,
    }
}
