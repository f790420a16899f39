//! Interactive crop tool
//!
//! A crop session maps between three frames:
//! - the square preview canvas (pixels, origin top-left),
//! - the source image (natural pixels, after any quarter turns),
//! - the mask, a fixed-aspect rectangle or circle centred in the canvas.
//!
//! The image may be zoomed and panned but never so far that the mask shows
//! empty canvas. On commit the image centre is stored relative to the mask
//! centre together with the mask's pixel size, so the same crop can be
//! re-projected onto a slot of any size later.

use crate::constants::{CROP_CANVAS_PX, CROP_MASK_FILL, CROP_MAX_ZOOM, CROP_MIN_ZOOM};
use crate::layout::{ImageTransform, Point, Rect, Size};
use crate::types::MaskShape;
use image::DynamicImage;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative difference below which two slot aspects are the same shape
const SLOT_ASPECT_TOLERANCE: f32 = 1e-4;

// =============================================================================
// Committed Crop
// =============================================================================

/// Crop result, relative to the slot it was made for
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CropPlacement {
    /// Image centre minus mask centre, in crop-canvas pixels
    pub center_offset_x: f32,
    pub center_offset_y: f32,
    /// Image scale at commit time
    pub scale: f32,
    /// Rotation applied to the source before scaling (multiples of 90)
    pub rotation_degrees: f32,
    /// On-screen mask size when the crop was made
    pub reference_slot_pixel_size: Size,
}

impl CropPlacement {
    pub fn is_valid(&self) -> bool {
        self.center_offset_x.is_finite()
            && self.center_offset_y.is_finite()
            && self.scale.is_finite()
            && self.scale > 0.0
            && !self.reference_slot_pixel_size.is_empty()
    }

    /// Ratio between a future slot and the slot the crop was made for
    pub fn scale_factor(&self, slot: &Rect) -> f32 {
        let reference = self.reference_slot_pixel_size.width;
        if reference > 0.0 && reference.is_finite() {
            slot.width / reference
        } else {
            1.0
        }
    }

    /// Re-derive the absolute image transform for `slot`
    pub fn project(&self, slot: &Rect) -> ImageTransform {
        let factor = self.scale_factor(slot);
        let center = slot.center();
        ImageTransform {
            center: Point::new(
                center.x + self.center_offset_x * factor,
                center.y + self.center_offset_y * factor,
            ),
            scale: self.scale * factor,
            rotation_degrees: self.rotation_degrees,
        }
    }
}

impl ImageTransform {
    /// The part of the image visible through `slot`, in (rotated) source pixels
    pub fn visible_source_rect(&self, slot: &Rect, image_size: Size) -> Rect {
        let left = self.center.x - image_size.width * self.scale / 2.0;
        let top = self.center.y - image_size.height * self.scale / 2.0;
        Rect::new(
            (slot.x - left) / self.scale,
            (slot.y - top) / self.scale,
            slot.width / self.scale,
            slot.height / self.scale,
        )
    }
}

/// One placed raster asset
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageSlot {
    /// Opaque handle (path or URL) understood by the renderer
    pub source: String,
    pub mask: MaskShape,
    /// Width:height of the slot the image was prepared for
    pub target_aspect: f32,
    /// `None` for natural graphics and uncropped photos
    #[cfg_attr(feature = "serde", serde(default))]
    pub crop: Option<CropPlacement>,
}

impl ImageSlot {
    /// Uncropped graphic shown at its natural aspect
    pub fn natural(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            mask: MaskShape::Rect,
            target_aspect: 1.0,
            crop: None,
        }
    }

    pub fn cropped(source: impl Into<String>, request: &CropRequest, crop: CropPlacement) -> Self {
        Self {
            source: source.into(),
            mask: request.mask,
            target_aspect: request.aspect,
            crop: Some(crop),
        }
    }

    /// Whether the image still fills a slot shaped by `request`.
    ///
    /// Natural images fit any slot; a crop only fits the slot shape it was
    /// committed for.
    pub fn fits(&self, request: &CropRequest) -> bool {
        self.crop.is_none() || request.same_slot(&CropRequest::new(self.target_aspect, self.mask))
    }
}

// =============================================================================
// Crop Geometry
// =============================================================================

/// Target slot shape and preview canvas for a crop
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CropRequest {
    /// Width:height of the slot
    pub aspect: f32,
    pub mask: MaskShape,
    /// Edge length of the square preview canvas in pixels
    pub canvas_size: f32,
}

impl CropRequest {
    pub fn new(aspect: f32, mask: MaskShape) -> Self {
        Self {
            aspect,
            mask,
            canvas_size: CROP_CANVAS_PX,
        }
    }

    /// Same mask shape and aspect; the preview canvas size is irrelevant
    pub fn same_slot(&self, other: &CropRequest) -> bool {
        self.mask == other.mask
            && (self.aspect - other.aspect).abs() <= SLOT_ASPECT_TOLERANCE * self.aspect.abs().max(1.0)
    }

    fn is_valid(&self) -> bool {
        self.aspect.is_finite()
            && self.aspect > 0.0
            && self.canvas_size.is_finite()
            && self.canvas_size > 0.0
    }

    /// Mask bounds, centred in the canvas, filling it on the longer side
    pub fn mask_rect(&self) -> Rect {
        let long_side = self.canvas_size * CROP_MASK_FILL;
        let size = match self.mask {
            MaskShape::Circle => Size::new(long_side, long_side),
            MaskShape::Rect if self.aspect >= 1.0 => Size::new(long_side, long_side / self.aspect),
            MaskShape::Rect => Size::new(long_side * self.aspect, long_side),
        };
        let center = self.canvas_size / 2.0;
        Rect::from_center(Point::new(center, center), size)
    }
}

/// Zoom/pan state of one crop, independent of pixel data
#[derive(Debug, Clone, PartialEq)]
pub struct CropTransform {
    image_size: Size,
    canvas_size: f32,
    mask: Rect,
    base_fit_scale: f32,
    cover_scale: f32,
    zoom: f32,
    scale: f32,
    /// Top-left corner of the image on the canvas
    offset: Point,
    quarter_turns: u8,
}

impl CropTransform {
    /// Set up a centred crop at zoom 1.
    ///
    /// Returns `None` for an empty image or an invalid request.
    pub fn new(image_size: Size, request: &CropRequest) -> Option<Self> {
        if image_size.is_empty() || !request.is_valid() {
            return None;
        }
        let mut transform = Self {
            image_size,
            canvas_size: request.canvas_size,
            mask: request.mask_rect(),
            base_fit_scale: 0.0,
            cover_scale: 0.0,
            zoom: CROP_MIN_ZOOM,
            scale: 0.0,
            offset: Point::default(),
            quarter_turns: 0,
        };
        transform.reset(image_size);
        Some(transform)
    }

    /// Recompute fit and coverage for a (new) source size and re-centre
    fn reset(&mut self, image_size: Size) {
        self.image_size = image_size;
        self.base_fit_scale = (self.canvas_size / image_size.width)
            .min(self.canvas_size / image_size.height);
        self.cover_scale =
            (self.mask.width / image_size.width).max(self.mask.height / image_size.height);
        self.zoom = CROP_MIN_ZOOM;
        self.scale = self.effective_scale(self.zoom);

        let center = self.canvas_size / 2.0;
        self.offset = Point::new(
            center - image_size.width * self.scale / 2.0,
            center - image_size.height * self.scale / 2.0,
        );
        self.clamp_offset();
    }

    /// Scale for a zoom factor, never below the scale that covers the mask
    fn effective_scale(&self, factor: f32) -> f32 {
        (self.base_fit_scale * factor).max(self.cover_scale)
    }

    /// Scale at which the whole image fits the canvas
    pub fn fit_scale(&self) -> f32 {
        self.base_fit_scale
    }

    /// Smallest scale at which the image covers the mask
    pub fn cover_scale(&self) -> f32 {
        self.cover_scale
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn zoom_factor(&self) -> f32 {
        self.zoom
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn canvas_size(&self) -> f32 {
        self.canvas_size
    }

    pub fn mask_rect(&self) -> Rect {
        self.mask
    }

    pub fn rotation_degrees(&self) -> f32 {
        f32::from(self.quarter_turns) * 90.0
    }

    /// Image bounds on the canvas at the current scale
    pub fn image_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.image_size.width * self.scale,
            self.image_size.height * self.scale,
        )
    }

    /// Zoom to `factor` × fit scale, anchored on the canvas centre.
    ///
    /// The factor is clamped to the allowed zoom range.
    pub fn zoom(&mut self, factor: f32) {
        let factor = if factor.is_nan() {
            CROP_MIN_ZOOM
        } else {
            factor.clamp(CROP_MIN_ZOOM, CROP_MAX_ZOOM)
        };
        let old_scale = self.scale;
        let new_scale = self.effective_scale(factor);
        let center = self.canvas_size / 2.0;
        let ratio = new_scale / old_scale;

        self.offset = Point::new(
            center - (center - self.offset.x) * ratio,
            center - (center - self.offset.y) * ratio,
        );
        self.zoom = factor;
        self.scale = new_scale;
        self.clamp_offset();
    }

    /// Drag the image by `(dx, dy)` canvas pixels, clamped to keep the mask covered
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if dx.is_finite() {
            self.offset.x += dx;
        }
        if dy.is_finite() {
            self.offset.y += dy;
        }
        self.clamp_offset();
    }

    /// Rotate the source a quarter turn clockwise and start over at zoom 1
    fn rotate_quarter(&mut self) {
        self.quarter_turns = (self.quarter_turns + 1) % 4;
        let rotated = Size::new(self.image_size.height, self.image_size.width);
        self.reset(rotated);
    }

    fn clamp_offset(&mut self) {
        let width = self.image_size.width * self.scale;
        let height = self.image_size.height * self.scale;
        self.offset.x = clamp_axis(self.offset.x, width, self.mask.x, self.mask.width);
        self.offset.y = clamp_axis(self.offset.y, height, self.mask.y, self.mask.height);
    }

    /// Image centre relative to mask centre, with the scale and mask size
    pub fn commit(&self) -> CropPlacement {
        let image = self.image_rect();
        let mask_center = self.mask.center();
        CropPlacement {
            center_offset_x: image.center_x() - mask_center.x,
            center_offset_y: image.center_y() - mask_center.y,
            scale: self.scale,
            rotation_degrees: self.rotation_degrees(),
            reference_slot_pixel_size: self.mask.size(),
        }
    }

    /// The part of the image visible through the mask, in (rotated) source pixels
    pub fn visible_source_rect(&self) -> Rect {
        Rect::new(
            (self.mask.x - self.offset.x) / self.scale,
            (self.mask.y - self.offset.y) / self.scale,
            self.mask.width / self.scale,
            self.mask.height / self.scale,
        )
    }
}

/// Clamp one axis so `[start, start + extent]` contains `[mask_start, mask_start + mask_extent]`.
///
/// When the image is narrower than the mask (only possible through rounding)
/// it is centred on the mask instead.
fn clamp_axis(start: f32, extent: f32, mask_start: f32, mask_extent: f32) -> f32 {
    let min = mask_start + mask_extent - extent;
    let max = mask_start;
    if min <= max {
        start.clamp(min, max)
    } else {
        mask_start + (mask_extent - extent) / 2.0
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// An active crop: the decoded image plus its transform
///
/// The decoded buffer is owned by the session and dropped with it.
#[derive(Debug, Clone)]
pub struct CropSession {
    image: DynamicImage,
    request: CropRequest,
    transform: CropTransform,
}

impl CropSession {
    /// Start a session over an already decoded image
    pub fn start(image: DynamicImage, request: CropRequest) -> Option<Self> {
        let size = Size::new(image.width() as f32, image.height() as f32);
        let transform = CropTransform::new(size, &request)?;
        Some(Self {
            image,
            request,
            transform,
        })
    }

    /// Decode `bytes` and start a session; decode failures yield `None`
    pub fn from_bytes(bytes: &[u8], request: CropRequest) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(image) => Self::start(image, request),
            Err(e) => {
                log::warn!("Crop image could not be decoded: {}", e);
                None
            }
        }
    }

    pub fn request(&self) -> &CropRequest {
        &self.request
    }

    pub fn transform(&self) -> &CropTransform {
        &self.transform
    }

    /// Working image, with any rotations applied
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn zoom(&mut self, factor: f32) {
        self.transform.zoom(factor);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.transform.pan(dx, dy);
    }

    /// Rotate the working buffer 90° clockwise and re-fit it
    pub fn rotate(&mut self) {
        self.image = self.image.rotate90();
        self.transform.rotate_quarter();
    }

    pub fn commit(self) -> CropPlacement {
        self.transform.commit()
    }
}

/// Lifecycle of the crop tool
#[derive(Debug, Clone, Default)]
pub enum CropState {
    #[default]
    Idle,
    Active(CropSession),
    Committed(CropPlacement),
    Cancelled,
}

/// Crop tool state machine: `Idle -> Active -> Committed | Cancelled`
#[derive(Debug, Default)]
pub struct CropTool {
    state: CropState,
}

impl CropTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, CropState::Active(_))
    }

    /// Begin cropping encoded image bytes. Returns `false` if decoding fails,
    /// in which case the tool is left `Idle`.
    pub fn start(&mut self, bytes: &[u8], request: CropRequest) -> bool {
        self.activate(CropSession::from_bytes(bytes, request))
    }

    /// Begin cropping an already decoded image
    pub fn start_with_image(&mut self, image: DynamicImage, request: CropRequest) -> bool {
        self.activate(CropSession::start(image, request))
    }

    /// Adopt a session decoded elsewhere; `None` leaves the tool `Idle`
    pub fn start_session(&mut self, session: Option<CropSession>) -> bool {
        self.activate(session)
    }

    fn activate(&mut self, session: Option<CropSession>) -> bool {
        match session {
            Some(session) => {
                self.state = CropState::Active(session);
                true
            }
            None => {
                self.state = CropState::Idle;
                false
            }
        }
    }

    pub fn session(&self) -> Option<&CropSession> {
        match &self.state {
            CropState::Active(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut CropSession> {
        match &mut self.state {
            CropState::Active(session) => Some(session),
            _ => None,
        }
    }

    /// Finish the active session. `None` if no session is active.
    pub fn commit(&mut self) -> Option<CropPlacement> {
        match std::mem::take(&mut self.state) {
            CropState::Active(session) => {
                let placement = session.commit();
                self.state = CropState::Committed(placement);
                Some(placement)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandon the active session, dropping its image buffer
    pub fn cancel(&mut self) {
        if self.is_active() {
            self.state = CropState::Cancelled;
        }
    }
}
