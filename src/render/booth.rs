//! # Photo Booth Composite
//!
//! Places a captured photo behind decorative frame art. The user adjusts
//! the photo with a [`BoothTransform`] (quarter-turn rotation, zoom, drag
//! offset measured in preview-viewport pixels); [`compose_booth_photo`]
//! replays that transform at full resolution:
//!
//! 1. the frame art is trimmed to its opaque bounds, which become the
//!    output size,
//! 2. the photo is cover-scaled to the frame's photo box (accounting for
//!    the rotation), rotated, zoomed and shifted by the drag offset,
//! 3. the photo is clipped to the photo box and the frame art is drawn
//!    on top.

use image::{DynamicImage, GenericImageView, RgbaImage, imageops, imageops::FilterType};
use tracing::debug;

use super::draw::{Area, WHITE, blit_clipped};
use super::error::RenderError;
use crate::image::geometry::{PixelRect, cover_scale};
use crate::image::image_rs_processor::{ImageRsProcessor, encode};
use crate::image::processor::{Bitmap, CodecError, OutputFormat};
use crate::image::transform::{opaque_bounds, rotate};

/// JPEG quality of composed booth photos.
pub const BOOTH_QUALITY: f32 = 0.92;
/// Camera captures are bounded to this height before editing.
pub const CAPTURE_MAX_HEIGHT: u32 = 1280;
pub const CAPTURE_QUALITY: f32 = 0.85;

/// Region of the frame art where the photo shows through, in art pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Corner radius of the clip; `0` for a plain rectangle.
    pub r: u32,
}

impl PhotoBox {
    /// Photo window of the bundled 720x1280 frame arts.
    pub const DEFAULT: Self = Self {
        x: 168,
        y: 334,
        w: 368,
        h: 500,
        r: 0,
    };
}

/// Decorative frame art plus the window the photo shows through.
#[derive(Debug, Clone)]
pub struct BoothFrame {
    art: RgbaImage,
    outer: PixelRect,
    photo_box: PhotoBox,
}

impl BoothFrame {
    /// Wraps `art`, measuring its opaque bounds. Fully transparent art
    /// keeps its whole canvas.
    pub fn new(art: RgbaImage, photo_box: PhotoBox) -> Self {
        let (w, h) = art.dimensions();
        let outer = opaque_bounds(&art, 1).unwrap_or(PixelRect { x: 0, y: 0, w, h });
        Self {
            art,
            outer,
            photo_box,
        }
    }

    pub fn decode(bytes: &[u8], photo_box: PhotoBox) -> Result<Self, RenderError> {
        let art = image::load_from_memory(bytes)
            .map_err(|e| CodecError::Decode(format!("frame art: {e}")))?
            .to_rgba8();
        Ok(Self::new(art, photo_box))
    }

    /// Opaque bounds of the art; the composed photo has this size.
    pub fn outer(&self) -> PixelRect {
        self.outer
    }

    pub fn photo_box(&self) -> PhotoBox {
        self.photo_box
    }

    /// Photo box relative to the trimmed art.
    fn clip_area(&self) -> Area {
        let pb = self.photo_box;
        Area::new(
            pb.x as f32 - self.outer.x as f32,
            pb.y as f32 - self.outer.y as f32,
            pb.w as f32,
            pb.h as f32,
        )
    }

    fn trimmed(&self) -> RgbaImage {
        let o = self.outer;
        imageops::crop_imm(&self.art, o.x, o.y, o.w, o.h).to_image()
    }
}

/// User adjustments made in the booth preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoothTransform {
    rotation: u32,
    scale: f32,
    offset: (f32, f32),
    viewport: (u32, u32),
}

impl BoothTransform {
    pub const INITIAL_SCALE: f32 = 0.94;
    pub const MIN_SCALE: f32 = 0.8;
    pub const MAX_SCALE: f32 = 3.0;
    /// Preview size assumed until the caller reports the real one.
    pub const DEFAULT_VIEWPORT: (u32, u32) = (300, 400);

    /// Starting transform for a freshly captured `width x height` photo:
    /// landscape shots are turned upright.
    pub fn for_photo(width: u32, height: u32) -> Self {
        Self {
            rotation: if width > height { 90 } else { 0 },
            scale: Self::INITIAL_SCALE,
            offset: (0.0, 0.0),
            viewport: Self::DEFAULT_VIEWPORT,
        }
    }

    /// Clockwise rotation in degrees, always a multiple of 90 below 360.
    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        self.offset
    }

    pub fn rotate_step(&mut self) {
        self.rotation = (self.rotation + 90) % 360;
    }

    /// Adds `delta` to the zoom, rounded to hundredths and clamped.
    pub fn zoom(&mut self, delta: f32) {
        self.set_scale(((self.scale + delta) * 100.0).round() / 100.0);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE);
    }

    /// Drag offset in preview-viewport pixels.
    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    /// Drag offset translated into photo-box pixels.
    fn box_offset(&self, clip: Area) -> (f32, f32) {
        let (vw, vh) = self.viewport;
        (
            self.offset.0 / vw.max(1) as f32 * clip.w,
            self.offset.1 / vh.max(1) as f32 * clip.h,
        )
    }
}

/// Renders the framed booth photo as JPEG.
///
/// Areas of the photo box the photo does not reach stay white.
pub fn compose_booth_photo(
    photo: &Bitmap,
    frame: &BoothFrame,
    transform: &BoothTransform,
) -> Result<Vec<u8>, RenderError> {
    let (iw, ih) = photo.dimensions();
    if iw == 0 || ih == 0 {
        return Err(CodecError::Invalid(format!("empty photo {iw}x{ih}")).into());
    }
    let outer = frame.outer();
    let clip = frame.clip_area();
    let mut canvas = RgbaImage::from_pixel(outer.w, outer.h, WHITE);

    let (ew, eh) = if transform.rotation % 180 == 90 {
        (ih, iw)
    } else {
        (iw, ih)
    };
    let total = cover_scale(ew as f64, eh as f64, clip.w as f64, clip.h as f64)
        * transform.scale as f64;
    let draw_w = ((iw as f64 * total).round() as u32).max(1);
    let draw_h = ((ih as f64 * total).round() as u32).max(1);

    let scaled = photo.resize_exact(draw_w, draw_h, FilterType::Triangle);
    let placed = rotate(&scaled, transform.rotation as f32).to_rgba8();

    let (tx, ty) = transform.box_offset(clip);
    let cx = clip.x + clip.w / 2.0 + tx;
    let cy = clip.y + clip.h / 2.0 + ty;
    let dx = (cx - placed.width() as f32 / 2.0).round() as i64;
    let dy = (cy - placed.height() as f32 / 2.0).round() as i64;
    blit_clipped(&mut canvas, &placed, dx, dy, clip, frame.photo_box.r as f32);

    imageops::overlay(&mut canvas, &frame.trimmed(), 0, 0);

    debug!(
        width = outer.w,
        height = outer.h,
        rotation = transform.rotation,
        scale = transform.scale,
        "composed booth photo"
    );
    Ok(encode(&DynamicImage::ImageRgba8(canvas), OutputFormat::Jpeg, BOOTH_QUALITY)?)
}

/// Bounds a camera capture to `max_height` (never upscaling) and re-encodes
/// it as JPEG. EXIF orientation is applied on decode.
pub fn resize_captured(bytes: &[u8], max_height: u32, quality: f32) -> Result<Vec<u8>, RenderError> {
    let img = ImageRsProcessor.decode(bytes)?;
    let (w, h) = img.dimensions();
    let ratio = (max_height as f64 / h as f64).min(1.0);
    let tw = ((w as f64 * ratio).round() as u32).max(1);
    let th = ((h as f64 * ratio).round() as u32).max(1);

    let sized = if (tw, th) == (w, h) {
        img
    } else {
        img.resize_exact(tw, th, FilterType::Triangle)
    };
    debug!(from_w = w, from_h = h, to_w = tw, to_h = th, "resized capture");
    Ok(encode(&sized, OutputFormat::Jpeg, quality)?)
}
