//! # Printable Album Document
//!
//! Paginates framed cards into an A4 PDF: a 2x3 grid per page, each card
//! embedded as a JPEG (`DCTDecode`) image and contain-fitted into its
//! cell, with a header (title, subtitle) and a footer (page number, export
//! date) repeated on every page.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.

use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::info;

use super::error::RenderError;
use crate::image::geometry::contain_scale;
use crate::image::image_rs_processor::encode;
use crate::image::processor::{Bitmap, OutputFormat};

pub const PAGE_W: f32 = 595.0;
pub const PAGE_H: f32 = 842.0;
pub const COLUMNS: usize = 2;
pub const ROWS: usize = 3;
pub const CARDS_PER_PAGE: usize = COLUMNS * ROWS;

const MARGIN: f32 = 36.0;
const HEADER_H: f32 = 56.0;
const FOOTER_H: f32 = 28.0;
const GUTTER: f32 = 12.0;
const CELL_PADDING: f32 = 6.0;

/// Header and footer texts plus the JPEG quality for embedded cards.
#[derive(Debug, Clone, Copy)]
pub struct DocumentOptions<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    /// Export date as printed in the footer.
    pub date_label: &'a str,
    pub quality: f32,
}

/// A grid cell in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

pub fn page_count(cards: usize) -> usize {
    cards.div_ceil(CARDS_PER_PAGE)
}

/// Cell for the `slot`-th card on a page, filled row by row from the top.
pub fn cell_rect(slot: usize) -> Cell {
    let grid_top = PAGE_H - MARGIN - HEADER_H;
    let grid_bottom = MARGIN + FOOTER_H;
    let grid_w = PAGE_W - 2.0 * MARGIN;
    let w = (grid_w - GUTTER * (COLUMNS - 1) as f32) / COLUMNS as f32;
    let h = (grid_top - grid_bottom - GUTTER * (ROWS - 1) as f32) / ROWS as f32;

    let col = (slot % COLUMNS) as f32;
    let row = ((slot % CARDS_PER_PAGE) / COLUMNS) as f32;
    Cell {
        x: MARGIN + col * (w + GUTTER),
        y: grid_top - row * (h + GUTTER) - h,
        w,
        h,
    }
}

/// Contain-fits an `iw x ih` image into `cell` minus the padding.
fn fit_in_cell(iw: u32, ih: u32, cell: Cell) -> Cell {
    let bw = cell.w - 2.0 * CELL_PADDING;
    let bh = cell.h - 2.0 * CELL_PADDING;
    let scale = contain_scale(iw.max(1) as f64, ih.max(1) as f64, bw as f64, bh as f64) as f32;
    let (w, h) = (iw as f32 * scale, ih as f32 * scale);
    Cell {
        x: cell.x + (cell.w - w) / 2.0,
        y: cell.y + (cell.h - h) / 2.0,
        w,
        h,
    }
}

/// Approximate width of `text` in Helvetica. Digits and `/` use their
/// real metrics, so dates right-align exactly.
fn helvetica_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            '/' | ' ' | '.' => 278,
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Text as a WinAnsi string; characters outside Latin-1 become `?`.
fn latin1(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn text_op(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![latin1(text)]));
    ops.push(Operation::new("ET", vec![]));
}

fn rule_op(ops: &mut Vec<Operation>, y: f32) {
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new("G", vec![0.7f32.into()]));
    ops.push(Operation::new("w", vec![0.8f32.into()]));
    ops.push(Operation::new("m", vec![MARGIN.into(), y.into()]));
    ops.push(Operation::new("l", vec![(PAGE_W - MARGIN).into(), y.into()]));
    ops.push(Operation::new("S", vec![]));
    ops.push(Operation::new("Q", vec![]));
}

fn jpeg_xobject(card: &Bitmap, quality: f32) -> Result<(Stream, u32, u32), RenderError> {
    let (w, h) = card.dimensions();
    let jpeg = encode(card, OutputFormat::Jpeg, quality)?;

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", w as i64);
    dict.set("Height", h as i64);
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", 8i64);
    dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
    dict.set("Length", jpeg.len() as i64);
    Ok((Stream::new(dict, jpeg).with_compression(false), w, h))
}

/// Builds the PDF and returns its bytes.
pub fn build_document(cards: &[Bitmap], opts: &DocumentOptions<'_>) -> Result<Vec<u8>, RenderError> {
    if cards.is_empty() {
        return Err(RenderError::Empty);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });

    let total = page_count(cards.len());
    let mut kids: Vec<Object> = Vec::with_capacity(total);

    for (page_index, chunk) in cards.chunks(CARDS_PER_PAGE).enumerate() {
        let mut ops = Vec::new();
        let mut xobjects = Dictionary::new();

        let header_y = PAGE_H - MARGIN;
        text_op(&mut ops, "F2", 18.0, MARGIN, header_y - 18.0, opts.title);
        text_op(&mut ops, "F1", 11.0, MARGIN, header_y - 36.0, opts.subtitle);
        rule_op(&mut ops, header_y - HEADER_H + 8.0);

        for (slot, card) in chunk.iter().enumerate() {
            let global = page_index * CARDS_PER_PAGE + slot;
            let name = format!("Im{global}");
            let (stream, w, h) = jpeg_xobject(card, opts.quality)?;
            let image_id: ObjectId = doc.add_object(stream);
            xobjects.set(name.as_bytes().to_vec(), image_id);

            let placed = fit_in_cell(w, h, cell_rect(slot));
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![
                    placed.w.into(),
                    0.into(),
                    0.into(),
                    placed.h.into(),
                    placed.x.into(),
                    placed.y.into(),
                ],
            ));
            ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            ops.push(Operation::new("Q", vec![]));
        }

        let footer_y = MARGIN;
        rule_op(&mut ops, footer_y + FOOTER_H - 8.0);
        let page_label = format!("Página {} de {}", page_index + 1, total);
        text_op(&mut ops, "F1", 9.0, MARGIN, footer_y + 6.0, &page_label);
        let date_x = PAGE_W - MARGIN - helvetica_width(opts.date_label, 9.0);
        text_op(&mut ops, "F1", 9.0, date_x, footer_y + 6.0, opts.date_label);

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => regular, "F2" => bold },
                "XObject" => xobjects,
            },
            "MediaBox" => vec![0.into(), 0.into(), PAGE_W.into(), PAGE_H.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => total as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RenderError::Document(e.to_string()))?;
    info!(cards = cards.len(), pages = total, bytes = out.len(), "document rendered");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn card(w: u32, h: u32) -> Bitmap {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([30, 90, 200, 255])))
    }

    fn opts() -> DocumentOptions<'static> {
        DocumentOptions {
            title: "Um aninho de Heitor!",
            subtitle: "Meu álbum",
            date_label: "16/10/2026",
            quality: 0.8,
        }
    }

    /// Image names drawn on each page, in page order.
    fn drawn_images(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).expect("valid pdf");
        doc.get_pages()
            .values()
            .map(|&page_id| {
                let raw = doc.get_page_content(page_id).expect("content");
                Content::decode(&raw)
                    .expect("decode content")
                    .operations
                    .into_iter()
                    .filter(|op| op.operator == "Do")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::Name(n)) => Some(String::from_utf8_lossy(n).into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(6), 1);
        assert_eq!(page_count(7), 2);
        assert_eq!(page_count(10), 2);
    }

    #[test]
    fn cells_fill_rows_from_the_top() {
        let first = cell_rect(0);
        let second = cell_rect(1);
        let third = cell_rect(2);
        assert_eq!(first.y, second.y);
        assert!(second.x > first.x);
        assert!(third.y < first.y);
        assert_eq!(third.x, first.x);
        // Slots wrap per page.
        assert_eq!(cell_rect(6), first);

        let last = cell_rect(5);
        assert!(last.y >= MARGIN + FOOTER_H - 0.01);
        assert!(last.x + last.w <= PAGE_W - MARGIN + 0.01);
    }

    #[test]
    fn fit_keeps_aspect_and_centers() {
        let cell = cell_rect(0);
        let placed = fit_in_cell(400, 100, cell);
        assert!((placed.w / placed.h - 4.0).abs() < 1e-3);
        assert!((placed.x - cell.x - CELL_PADDING).abs() < 1e-3);
        let mid = placed.y + placed.h / 2.0;
        assert!((mid - (cell.y + cell.h / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(build_document(&[], &opts()), Err(RenderError::Empty)));
    }

    #[test]
    fn ten_cards_make_two_pages_in_order() {
        let cards: Vec<Bitmap> = (0..10).map(|i| card(40 + i, 60)).collect();
        let bytes = build_document(&cards, &opts()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let pages = drawn_images(&bytes);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], ["Im0", "Im1", "Im2", "Im3", "Im4", "Im5"]);
        assert_eq!(pages[1], ["Im6", "Im7", "Im8", "Im9"]);
    }

    #[test]
    fn date_width_uses_digit_metrics() {
        assert!((helvetica_width("16/10/2026", 10.0) - 50.04).abs() < 1e-3);
    }

    #[test]
    fn non_latin_text_is_replaced() {
        match latin1("álbum ✓") {
            Object::String(bytes, _) => assert_eq!(bytes, [0xE1, b'l', b'b', b'u', b'm', b' ', b'?']),
            other => panic!("unexpected {other:?}"),
        }
    }
}
