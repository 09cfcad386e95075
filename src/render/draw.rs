//! Raster primitives shared by the collage, card and booth renderers.
//!
//! Shapes are rasterised from a signed distance to a rounded rectangle and
//! blended with one pixel of anti-aliasing, so the same helpers cover
//! fills, strokes, clip masks and soft shadows.

use image::{GenericImageView, GrayImage, Luma, Rgba, RgbaImage, imageops::FilterType};
use imageproc::filter::gaussian_blur_f32;

use crate::image::geometry::fit_within;
use crate::image::processor::Bitmap;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Near-black used for outlines and banner text.
pub const INK: Rgba<u8> = Rgba([0x11, 0x11, 0x11, 255]);

/// Opaque color from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Rgba<u8> {
    Rgba([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
}

/// A rectangle in canvas coordinates. Fractional edges are allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Shrinks the area by `d` on every side.
    pub fn inset(&self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, (self.w - 2.0 * d).max(0.0), (self.h - 2.0 * d).max(0.0))
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Pixel range `[x0, x1) x [y0, y1)` touched by the area grown by `pad`,
    /// clamped to a `w x h` canvas.
    fn span(&self, pad: f32, w: u32, h: u32) -> (u32, u32, u32, u32) {
        let clamp = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
        (
            clamp((self.x - pad).floor(), w),
            clamp((self.y - pad).floor(), h),
            clamp((self.x + self.w + pad).ceil(), w),
            clamp((self.y + self.h + pad).ceil(), h),
        )
    }
}

/// A blurred, offset silhouette drawn beneath a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    /// Shadow color; its alpha is the peak opacity.
    pub color: Rgba<u8>,
    pub blur: f32,
    pub offset_y: f32,
}

/// Signed distance from a point to a rounded rectangle (negative inside).
///
/// The radius is clamped to half the shorter side.
pub fn rounded_rect_distance(px: f32, py: f32, area: Area, radius: f32) -> f32 {
    let r = radius.min(area.w / 2.0).min(area.h / 2.0).max(0.0);
    let qx = (px - (area.x + area.w / 2.0)).abs() - (area.w / 2.0 - r);
    let qy = (py - (area.y + area.h / 2.0)).abs() - (area.h / 2.0 - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - r
}

/// Fraction of the pixel at `(x, y)` covered by the rounded rectangle.
fn fill_coverage(x: u32, y: u32, area: Area, radius: f32) -> f32 {
    let d = rounded_rect_distance(x as f32 + 0.5, y as f32 + 0.5, area, radius);
    (0.5 - d).clamp(0.0, 1.0)
}

/// Source-over blend of `src` into `dst`, scaled by `coverage`.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let a = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return;
    }
    for c in 0..3 {
        dst[c] = (dst[c] as f32 * (1.0 - a) + src[c] as f32 * a).round() as u8;
    }
    dst[3] = (dst[3] as f32 + (255.0 - dst[3] as f32) * a).round() as u8;
}

pub fn fill_rounded_rect(canvas: &mut RgbaImage, area: Area, radius: f32, color: Rgba<u8>) {
    let (x0, y0, x1, y1) = area.span(1.0, canvas.width(), canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let cov = fill_coverage(x, y, area, radius);
            if cov > 0.0 {
                blend(canvas.get_pixel_mut(x, y), color, cov);
            }
        }
    }
}

/// Strokes the outline of a rounded rectangle, centered on its edge.
pub fn stroke_rounded_rect(
    canvas: &mut RgbaImage,
    area: Area,
    radius: f32,
    line_width: f32,
    color: Rgba<u8>,
) {
    let half = line_width / 2.0;
    let (x0, y0, x1, y1) = area.span(half + 1.0, canvas.width(), canvas.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let d = rounded_rect_distance(x as f32 + 0.5, y as f32 + 0.5, area, radius);
            let cov = (half + 0.5 - d.abs()).clamp(0.0, 1.0);
            if cov > 0.0 {
                blend(canvas.get_pixel_mut(x, y), color, cov);
            }
        }
    }
}

/// Paints a gaussian-blurred silhouette of the rounded rectangle.
pub fn drop_shadow(canvas: &mut RgbaImage, area: Area, radius: f32, shadow: &Shadow) {
    let shape = area.offset(0.0, shadow.offset_y);
    // Canvas shadowBlur is twice the gaussian sigma.
    let sigma = (shadow.blur / 2.0).max(0.0);
    let pad = (sigma * 3.0).ceil() + 1.0;
    let (x0, y0, x1, y1) = shape.span(pad, canvas.width(), canvas.height());
    if x1 <= x0 || y1 <= y0 {
        return;
    }

    let mut mask = GrayImage::from_fn(x1 - x0, y1 - y0, |x, y| {
        Luma([(fill_coverage(x + x0, y + y0, shape, radius) * 255.0).round() as u8])
    });
    if sigma > 0.0 {
        mask = gaussian_blur_f32(&mask, sigma);
    }

    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] > 0 {
            blend(canvas.get_pixel_mut(x + x0, y + y0), shadow.color, m[0] as f32 / 255.0);
        }
    }
}

/// Draws `src` with its top-left corner at `(dx, dy)`, keeping only the
/// part inside the rounded `clip` area.
pub fn blit_clipped(canvas: &mut RgbaImage, src: &RgbaImage, dx: i64, dy: i64, clip: Area, radius: f32) {
    let (cw, ch) = canvas.dimensions();
    let (x0, y0, x1, y1) = clip.span(1.0, cw, ch);
    for y in y0..y1 {
        let sy = y as i64 - dy;
        if sy < 0 || sy >= src.height() as i64 {
            continue;
        }
        for x in x0..x1 {
            let sx = x as i64 - dx;
            if sx < 0 || sx >= src.width() as i64 {
                continue;
            }
            let px = *src.get_pixel(sx as u32, sy as u32);
            let cov = fill_coverage(x, y, clip, radius) * (px[3] as f32 / 255.0);
            if cov > 0.0 {
                blend(canvas.get_pixel_mut(x, y), Rgba([px[0], px[1], px[2], 255]), cov);
            }
        }
    }
}

/// Scales `img` to fit inside `area` without cropping, centers it and clips
/// it to the area's rounded corners.
pub fn draw_contain(canvas: &mut RgbaImage, img: &Bitmap, area: Area, clip_radius: f32) {
    let (iw, ih) = img.dimensions();
    let box_w = area.w.round().max(0.0) as u32;
    let box_h = area.h.round().max(0.0) as u32;
    let fit = fit_within(iw, ih, box_w, box_h);
    if fit.w == 0 || fit.h == 0 {
        return;
    }
    let scaled = if (fit.w, fit.h) == (iw, ih) {
        img.to_rgba8()
    } else {
        img.resize_exact(fit.w, fit.h, FilterType::Triangle).to_rgba8()
    };
    let dx = area.x.round() as i64 + fit.offset_x as i64;
    let dy = area.y.round() as i64 + fit.offset_y as i64;
    blit_clipped(canvas, &scaled, dx, dy, area, clip_radius);
}
