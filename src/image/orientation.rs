//! EXIF orientation handling.
//!
//! Camera captures are often stored sideways with an `Orientation` tag that
//! tells viewers how to display them. Decoding applies the tag so the
//! portrait/landscape decision is made on what the user actually sees.

use std::io::Cursor;

use exif::{In, Reader, Tag};

use super::processor::Bitmap;

/// Reads the EXIF `Orientation` tag (1–8). `None` when the container has no
/// EXIF block or the tag is missing.
pub fn read_exif_orientation(bytes: &[u8]) -> Option<u32> {
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .filter(|v| (1..=8).contains(v))
}

/// Applies an EXIF orientation value to the decoded pixels.
pub fn apply_exif_orientation(img: Bitmap, orientation: u32) -> Bitmap {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.fliph().rotate270(),
        6 => img.rotate90(),
        7 => img.fliph().rotate90(),
        8 => img.rotate270(),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn missing_exif_yields_none() {
        assert_eq!(read_exif_orientation(b"not an image"), None);
        assert_eq!(read_exif_orientation(&[]), None);
    }

    #[test]
    fn sideways_tags_swap_dimensions() {
        for tag in [5, 6, 7, 8] {
            let out = apply_exif_orientation(Bitmap::new_rgb8(30, 10), tag);
            assert_eq!(out.dimensions(), (10, 30), "tag {tag}");
        }
        for tag in [1, 2, 3, 4, 99] {
            let out = apply_exif_orientation(Bitmap::new_rgb8(30, 10), tag);
            assert_eq!(out.dimensions(), (30, 10), "tag {tag}");
        }
    }
}
