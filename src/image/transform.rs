//! Pixel-level transforms: arbitrary-angle rotation, alpha flattening and
//! opaque-bounds detection.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage, imageops};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use super::geometry::{PixelRect, rotated_bounds};
use super::processor::Bitmap;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Rotates `bitmap` clockwise by `degrees`.
///
/// The output canvas is exactly [`rotated_bounds`] of the source, so no
/// pixel is clipped. Quarter turns are lossless; other angles use bilinear
/// interpolation over a transparent background.
pub fn rotate(bitmap: &Bitmap, degrees: f32) -> Bitmap {
    let norm = degrees.rem_euclid(360.0);
    let quarter = (norm / 90.0).round();
    if (norm - quarter * 90.0).abs() < 1e-4 {
        return match quarter as u32 % 4 {
            1 => bitmap.rotate90(),
            2 => bitmap.rotate180(),
            3 => bitmap.rotate270(),
            _ => bitmap.clone(),
        };
    }

    let (w, h) = bitmap.dimensions();
    let (nw, nh) = rotated_bounds(w, h, norm as f64);

    // Work canvas must hold both the source and the rotated result, since the
    // rotated bounds can be narrower than the source along one axis.
    let cw = nw.max(w);
    let ch = nh.max(h);
    let mut canvas = RgbaImage::from_pixel(cw, ch, TRANSPARENT);
    imageops::overlay(
        &mut canvas,
        &bitmap.to_rgba8(),
        ((cw - w) / 2) as i64,
        ((ch - h) / 2) as i64,
    );

    let rotated = rotate_about_center(
        &canvas,
        norm.to_radians(),
        Interpolation::Bilinear,
        TRANSPARENT,
    );
    let cropped = imageops::crop_imm(&rotated, (cw - nw) / 2, (ch - nh) / 2, nw, nh).to_image();
    DynamicImage::ImageRgba8(cropped)
}

/// Smallest rectangle containing every pixel whose alpha is at least
/// `alpha_threshold`. `None` when no pixel qualifies.
pub fn opaque_bounds(img: &RgbaImage, alpha_threshold: u8) -> Option<PixelRect> {
    let (w, h) = img.dimensions();
    let (mut min_x, mut min_y) = (w, h);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut found = false;

    for (x, y, px) in img.enumerate_pixels() {
        if px[3] < alpha_threshold.max(1) {
            continue;
        }
        found = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    found.then(|| PixelRect {
        x: min_x,
        y: min_y,
        w: max_x - min_x + 1,
        h: max_y - min_y + 1,
    })
}

/// Composites `bitmap` over an opaque white background.
pub fn flatten_on_white(bitmap: &Bitmap) -> RgbImage {
    if !bitmap.color().has_alpha() {
        return bitmap.to_rgb8();
    }
    let rgba = bitmap.to_rgba8();
    let (w, h) = rgba.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let a = a as u32;
        let mix = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        Rgb([mix(r), mix(g), mix(b)])
    })
}
