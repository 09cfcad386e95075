//! # Collage Renderer
//!
//! Lays out up to four photos on a portrait canvas (10x15 print ratio):
//!
//! - 1 photo: one centered square
//! - 2 photos: two squares side by side
//! - 3 or 4 photos: a 2x2 grid (the fourth cell stays empty for three)
//!
//! Each photo sits in a rounded white card with a drop shadow, a colored
//! frame from [`PALETTE`](super::frame::PALETTE) and a dark outline. A
//! banner with the title and subtitle closes the page.
//!
//! The layout constants are absolute pixels and do not scale with the
//! canvas; smaller canvases simply get a tighter grid.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{debug, info};

use super::draw::{
    Area, INK, Shadow, WHITE, draw_contain, drop_shadow, fill_rounded_rect, stroke_rounded_rect,
};
use super::error::RenderError;
use super::frame::palette_color;
use super::text::BannerFont;
use crate::config::render::CanvasSpec;
use crate::image::image_rs_processor::encode;
use crate::image::processor::{Bitmap, OutputFormat};

/// Photos beyond this count are not drawn.
pub const MAX_COLLAGE_PHOTOS: usize = 4;

const OUTER_MARGIN: f32 = 54.0;
const GAP: f32 = 22.0;
const BANNER_H: f32 = 300.0;
/// Breathing room between the grid and the banner.
const GRID_BANNER_GAP: f32 = 20.0;
const BANNER_X: f32 = 64.0;
const BANNER_BOTTOM: f32 = 54.0;

const CARD_RADIUS: f32 = 28.0;
const FRAME_WIDTH: f32 = 18.0;
const FRAME_INSET: f32 = 10.0;
const FRAME_RADIUS: f32 = 22.0;
const OUTLINE_WIDTH: f32 = 6.0;

const BORDER_INSET: f32 = 24.0;
const BORDER_WIDTH: f32 = 10.0;
const BORDER_RADIUS: f32 = 26.0;

const TITLE_SIZE: f32 = 66.0;
const TITLE_BASELINE: f32 = 125.0;
const SUBTITLE_SIZE: f32 = 36.0;
const SUBTITLE_BASELINE: f32 = 205.0;
/// 75% black over white.
const SUBTITLE_INK: Rgba<u8> = Rgba([0x40, 0x40, 0x40, 255]);

const CARD_SHADOW: Shadow = Shadow {
    color: Rgba([0, 0, 0, 31]),
    blur: 16.0,
    offset_y: 8.0,
};
const BANNER_SHADOW: Shadow = Shadow {
    color: Rgba([0, 0, 0, 26]),
    blur: 18.0,
    offset_y: 8.0,
};

/// Everything a collage needs besides the photos.
#[derive(Debug, Clone, Copy)]
pub struct CollageOptions<'a> {
    pub canvas: CanvasSpec,
    pub title: &'a str,
    pub subtitle: &'a str,
    /// Banner text is skipped without a font; the banner band is still drawn.
    pub font: Option<&'a BannerFont>,
}

impl<'a> CollageOptions<'a> {
    pub fn new(canvas: CanvasSpec, title: &'a str, subtitle: &'a str) -> Self {
        Self {
            canvas,
            title,
            subtitle,
            font: None,
        }
    }

    pub fn with_font(mut self, font: Option<&'a BannerFont>) -> Self {
        self.font = font;
        self
    }
}

/// Area reserved for photos on a `width x height` canvas.
fn grid_area(width: u32, height: u32) -> Area {
    Area::new(
        OUTER_MARGIN,
        OUTER_MARGIN,
        width as f32 - OUTER_MARGIN * 2.0,
        height as f32 - BANNER_H - OUTER_MARGIN * 2.0 - GRID_BANNER_GAP,
    )
}

fn banner_area(width: u32, height: u32) -> Area {
    Area::new(
        BANNER_X,
        height as f32 - BANNER_H - BANNER_BOTTOM,
        width as f32 - BANNER_X * 2.0,
        BANNER_H,
    )
}

/// Square slots for `count` photos inside `grid`.
pub fn slot_layout(count: usize, grid: Area) -> Vec<Area> {
    match count {
        0 => Vec::new(),
        1 => {
            let side = grid.w.min(grid.h);
            vec![Area::new(
                grid.x + (grid.w - side) / 2.0,
                grid.y + (grid.h - side) / 2.0,
                side,
                side,
            )]
        }
        2 => {
            let side = ((grid.w - GAP) / 2.0).min(grid.h);
            let x = grid.x + (grid.w - (side * 2.0 + GAP)) / 2.0;
            let y = grid.y + (grid.h - side) / 2.0;
            vec![Area::new(x, y, side, side), Area::new(x + side + GAP, y, side, side)]
        }
        n => {
            let side = ((grid.w - GAP) / 2.0).min((grid.h - GAP) / 2.0);
            let total = side * 2.0 + GAP;
            let x = grid.x + (grid.w - total) / 2.0;
            let y = grid.y + (grid.h - total) / 2.0;
            [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
                .into_iter()
                .take(n.min(MAX_COLLAGE_PHOTOS))
                .map(|(col, row)| Area::new(x + col * (side + GAP), y + row * (side + GAP), side, side))
                .collect()
        }
    }
}

fn draw_framed_slot(canvas: &mut RgbaImage, photo: &Bitmap, slot: Area, frame_color: Rgba<u8>) {
    drop_shadow(canvas, slot, CARD_RADIUS, &CARD_SHADOW);
    fill_rounded_rect(canvas, slot, CARD_RADIUS, WHITE);
    draw_contain(canvas, photo, slot, CARD_RADIUS);
    stroke_rounded_rect(
        canvas,
        slot.inset(FRAME_INSET),
        FRAME_RADIUS,
        FRAME_WIDTH,
        frame_color,
    );
    stroke_rounded_rect(canvas, slot, CARD_RADIUS, OUTLINE_WIDTH, INK);
}

/// Renders the collage. Fails with [`RenderError::Empty`] for no photos.
pub fn build_collage(photos: &[Bitmap], opts: &CollageOptions<'_>) -> Result<Bitmap, RenderError> {
    if photos.is_empty() {
        return Err(RenderError::Empty);
    }
    let (w, h) = (opts.canvas.width, opts.canvas.height);
    let grid = grid_area(w, h);
    let banner = banner_area(w, h);
    if grid.w <= GAP || grid.h <= GAP || banner.w <= 0.0 {
        return Err(RenderError::InvalidSize {
            width: w,
            height: h,
        });
    }

    let used = &photos[..photos.len().min(MAX_COLLAGE_PHOTOS)];
    if used.len() < photos.len() {
        debug!(
            total = photos.len(),
            drawn = used.len(),
            "extra photos left out of the collage"
        );
    }

    let mut canvas = RgbaImage::from_pixel(w, h, WHITE);
    stroke_rounded_rect(
        &mut canvas,
        Area::new(0.0, 0.0, w as f32, h as f32).inset(BORDER_INSET),
        BORDER_RADIUS,
        BORDER_WIDTH,
        INK,
    );

    for (i, (photo, slot)) in used.iter().zip(slot_layout(used.len(), grid)).enumerate() {
        draw_framed_slot(&mut canvas, photo, slot, palette_color(i));
    }

    drop_shadow(&mut canvas, banner, CARD_RADIUS, &BANNER_SHADOW);
    fill_rounded_rect(&mut canvas, banner, CARD_RADIUS, WHITE);
    stroke_rounded_rect(&mut canvas, banner, CARD_RADIUS, OUTLINE_WIDTH, INK);

    if let Some(font) = opts.font {
        let cx = w as f32 / 2.0;
        font.draw_centered(&mut canvas, opts.title, cx, banner.y + TITLE_BASELINE, TITLE_SIZE, INK);
        font.draw_centered(
            &mut canvas,
            opts.subtitle,
            cx,
            banner.y + SUBTITLE_BASELINE,
            SUBTITLE_SIZE,
            SUBTITLE_INK,
        );
    }

    info!(width = w, height = h, photos = used.len(), "collage rendered");
    Ok(DynamicImage::ImageRgba8(canvas))
}

/// [`build_collage`] encoded as JPEG at the canvas quality.
pub fn render_collage_jpeg(photos: &[Bitmap], opts: &CollageOptions<'_>) -> Result<Vec<u8>, RenderError> {
    let collage = build_collage(photos, opts)?;
    Ok(encode(&collage, OutputFormat::Jpeg, opts.canvas.quality)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    const SMALL: CanvasSpec = CanvasSpec {
        width: 600,
        height: 900,
        quality: 0.9,
    };

    fn solid(w: u32, h: u32, rgb: [u8; 3]) -> Bitmap {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([rgb[0], rgb[1], rgb[2], 255])))
    }

    fn center(a: &Area) -> (u32, u32) {
        ((a.x + a.w / 2.0) as u32, (a.y + a.h / 2.0) as u32)
    }

    fn opts() -> CollageOptions<'static> {
        CollageOptions::new(SMALL, "Um aninho de Heitor!", "Meu álbum")
    }

    #[test]
    fn layout_for_each_count() {
        let grid = grid_area(1200, 1800);
        assert_eq!((grid.w, grid.h), (1092.0, 1372.0));

        let one = slot_layout(1, grid);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].w, 1092.0);
        assert_eq!(one[0].x, OUTER_MARGIN);

        let two = slot_layout(2, grid);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].y, two[1].y);
        assert_eq!(two[1].x - two[0].x, two[0].w + GAP);

        let three = slot_layout(3, grid);
        assert_eq!(three.len(), 3);
        assert_eq!(three[2].x, three[0].x);
        assert!(three[2].y > three[0].y);

        assert_eq!(slot_layout(4, grid).len(), 4);
        assert_eq!(slot_layout(6, grid).len(), 4);
        assert!(slot_layout(0, grid).is_empty());
    }

    #[test]
    fn empty_input_fails_fast() {
        assert!(matches!(build_collage(&[], &opts()), Err(RenderError::Empty)));
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let o = CollageOptions::new(
            CanvasSpec {
                width: 100,
                height: 300,
                quality: 0.9,
            },
            "t",
            "s",
        );
        let err = build_collage(&[solid(10, 10, [0, 0, 0])], &o).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize { width: 100, height: 300 }));
    }

    #[test]
    fn single_photo_fills_its_slot() {
        let img = build_collage(&[solid(64, 64, [200, 0, 0])], &opts()).unwrap();
        assert_eq!(img.dimensions(), (600, 900));

        let slot = slot_layout(1, grid_area(600, 900))[0];
        let (cx, cy) = center(&slot);
        assert_eq!(img.get_pixel(cx, cy), Rgba([200, 0, 0, 255]));
        // Outer border.
        assert_eq!(img.get_pixel(300, 24), INK);
    }

    #[test]
    fn three_photos_leave_fourth_cell_blank() {
        let photos = vec![
            solid(32, 32, [200, 0, 0]),
            solid(32, 32, [0, 200, 0]),
            solid(32, 32, [0, 0, 200]),
        ];
        let img = build_collage(&photos, &opts()).unwrap();
        let cells = slot_layout(4, grid_area(600, 900));

        let (x, y) = center(&cells[2]);
        assert_eq!(img.get_pixel(x, y), Rgba([0, 0, 200, 255]));
        let (x, y) = center(&cells[3]);
        assert_eq!(img.get_pixel(x, y), WHITE);
    }

    #[test]
    fn jpeg_output_decodes_at_canvas_size() {
        let bytes = render_collage_jpeg(&[solid(40, 60, [10, 20, 30])], &opts()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (600, 900));
    }
}
