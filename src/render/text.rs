//! Banner text rendering with a TrueType font.
//!
//! No font is bundled: callers load one from [`RenderConfig::font_path`]
//! and skip text when none is configured.
//!
//! [`RenderConfig::font_path`]: crate::config::render::RenderConfig

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::debug;

use super::error::RenderError;

/// A parsed font used for collage banners.
pub struct BannerFont {
    font: FontVec,
}

impl std::fmt::Debug for BannerFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BannerFont").finish_non_exhaustive()
    }
}

impl BannerFont {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| RenderError::Font(format!("invalid font data: {e}")))?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RenderError::Font(format!("read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded banner font");
        Self::from_bytes(bytes)
    }

    /// Rendered `(width, height)` of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (u32, u32) {
        text_size(PxScale::from(size), &self.font, text)
    }

    /// Draws `text` horizontally centered on `center_x`, with its baseline
    /// at `baseline_y`.
    pub fn draw_centered(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        center_x: f32,
        baseline_y: f32,
        size: f32,
        color: Rgba<u8>,
    ) {
        let scale = PxScale::from(size);
        let (w, _) = self.measure(text, size);
        let ascent = self.font.as_scaled(scale).ascent();
        let x = (center_x - w as f32 / 2.0).round() as i32;
        let y = (baseline_y - ascent).round() as i32;
        draw_text_mut(canvas, color, x, y, scale, &self.font, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SYSTEM_FONT: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

    fn system_font() -> Option<BannerFont> {
        BannerFont::load(&PathBuf::from(SYSTEM_FONT)).ok()
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = BannerFont::from_bytes(vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
    }

    #[test]
    fn missing_file_is_a_font_error() {
        let err = BannerFont::load(Path::new("/nonexistent/font.ttf")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }

    #[test]
    fn draws_ink_around_the_center() {
        // Only runs where the DejaVu fonts are installed.
        let Some(font) = system_font() else { return };
        let mut canvas = RgbaImage::from_pixel(400, 100, Rgba([255, 255, 255, 255]));
        font.draw_centered(&mut canvas, "Heitor", 200.0, 70.0, 40.0, Rgba([0, 0, 0, 255]));

        let inked: Vec<u32> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] < 128)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!inked.is_empty());
        let min = *inked.iter().min().unwrap();
        let max = *inked.iter().max().unwrap();
        assert!(min > 100 && max < 300, "ink spans {min}..{max}");
    }
}
