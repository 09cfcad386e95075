//! Standalone framed cards used by the printable document.

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgba, imageops};

use super::draw::{WHITE, hex};
use crate::image::processor::Bitmap;

/// Frame colors, cycled per slot.
pub const PALETTE: [Rgba<u8>; 4] = [
    hex(0x0B5ED7),
    hex(0xFF9F43),
    hex(0x2ECC71),
    hex(0x9B59B6),
];

/// Border thickness relative to the photo's smaller side.
const BORDER_RATIO: f32 = 0.05;
const MIN_BORDER: u32 = 4;

/// Frame color for the slot at `index`.
pub fn palette_color(index: usize) -> Rgba<u8> {
    PALETTE[index % PALETTE.len()]
}

/// Colored border and white mat sizes for a `w x h` photo.
pub fn border_sizes(w: u32, h: u32) -> (u32, u32) {
    let border = ((w.min(h) as f32 * BORDER_RATIO).round() as u32).max(MIN_BORDER);
    (border, (border / 2).max(1))
}

/// Surrounds `photo` with a white mat and a solid `color` border.
///
/// Both bands scale with the photo's smaller dimension, so cards of
/// different resolutions look alike once printed at the same size.
pub fn make_framed_card(photo: &Bitmap, color: Rgba<u8>) -> Bitmap {
    let (w, h) = photo.dimensions();
    let (border, mat) = border_sizes(w, h);
    let pad = border + mat;

    let mut card = ImageBuffer::from_pixel(w + 2 * pad, h + 2 * pad, color);
    let inner = ImageBuffer::from_pixel(w + 2 * mat, h + 2 * mat, WHITE);
    imageops::overlay(&mut card, &inner, border as i64, border as i64);
    imageops::overlay(&mut card, &photo.to_rgba8(), pad as i64, pad as i64);
    DynamicImage::ImageRgba8(card)
}
