//! # Image Processor Implementation (image-rs)
//!
//! Provides an [`ImageProcessor`] implementation using the [`image`] crate.
//!
//! Normalisation follows the album pipeline:
//! 1. center-crop to the target ratio (when one is given),
//! 2. downscale so the largest side is at most `max_side` (never upscale),
//! 3. flatten transparency onto white,
//! 4. re-encode as JPEG (with quality), PNG or WebP.
//!
//! # Example
//! ```rust,no_run
//! use keepsake::image::image_rs_processor::ImageRsProcessor;
//! use keepsake::image::processor::{ImageProcessor, NormalizeOptions, OutputFormat};
//!
//! let processor = ImageRsProcessor::default();
//! let upload = std::fs::read("capture.jpg").unwrap();
//!
//! let bitmap = processor.decode(&upload).expect("decodable");
//! let opts = NormalizeOptions::new(1280, 0.78, OutputFormat::Jpeg).with_target_ratio(2.0 / 3.0);
//! let jpeg = processor.normalize(&bitmap, &opts).expect("encode ok");
//! std::fs::write("normalized.jpg", jpeg).unwrap();
//! ```

use std::io::Cursor;

use image::{
    ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader, codecs::jpeg::JpegEncoder,
    imageops::FilterType,
};
use tracing::debug;

use super::geometry::{crop_to_ratio, downscale_dims};
use super::orientation::{apply_exif_orientation, read_exif_orientation};
use super::processor::{Bitmap, CodecError, ImageProcessor, NormalizeOptions, OutputFormat};
use super::transform::flatten_on_white;

/// A concrete implementation of [`ImageProcessor`] using the `image` crate.
#[derive(Clone, Debug, Default)]
pub struct ImageRsProcessor;

impl ImageRsProcessor {
    /// Returns `true` if the given MIME type can be produced by [`encode`]
    /// as a compressed photo.
    ///
    /// WebP is reported as unsupported: the `image` encoder is lossless
    /// only, so it cannot honour a quality setting and its output is several
    /// times larger than the JPEG it would replace. Callers fall back to JPEG.
    pub fn supports(&self, content_type: &str) -> bool {
        matches!(
            OutputFormat::from_content_type(content_type),
            Some(OutputFormat::Jpeg | OutputFormat::Png)
        )
    }

    /// Decodes bytes, sniffing the container format, and applies any EXIF
    /// orientation tag.
    pub fn decode(&self, bytes: &[u8]) -> Result<Bitmap, CodecError> {
        let img = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(format!("guess format: {e}")))?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err(CodecError::Invalid(format!("empty image {w}x{h}")));
        }

        Ok(match read_exif_orientation(bytes) {
            Some(tag) if tag != 1 => {
                debug!(tag, "applying EXIF orientation");
                apply_exif_orientation(img, tag)
            }
            _ => img,
        })
    }

    /// Crops, bounds and re-encodes a bitmap.
    pub fn normalize(
        &self,
        bitmap: &Bitmap,
        opts: &NormalizeOptions,
    ) -> Result<Vec<u8>, CodecError> {
        let (w0, h0) = bitmap.dimensions();
        if w0 == 0 || h0 == 0 {
            return Err(CodecError::Invalid(format!("empty image {w0}x{h0}")));
        }

        // A non-positive ratio leaves the source uncropped.
        let crop = crop_to_ratio(w0, h0, opts.target_ratio.unwrap_or(0.0));
        let (w, h) = downscale_dims(crop.w, crop.h, opts.max_side);

        let cropped = if (crop.w, crop.h) == (w0, h0) {
            bitmap.clone()
        } else {
            bitmap.crop_imm(crop.x, crop.y, crop.w, crop.h)
        };
        let sized = if (w, h) == (crop.w, crop.h) {
            cropped
        } else {
            cropped.resize_exact(w, h, FilterType::Triangle)
        };

        debug!(
            from_w = w0,
            from_h = h0,
            to_w = w,
            to_h = h,
            format = opts.format.content_type(),
            "normalized photo"
        );
        encode(&sized, opts.format, opts.quality)
    }
}

impl ImageProcessor for ImageRsProcessor {
    fn supports(&self, content_type: &str) -> bool {
        ImageRsProcessor::supports(self, content_type)
    }
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, CodecError> {
        ImageRsProcessor::decode(self, bytes)
    }
    fn normalize(&self, bitmap: &Bitmap, opts: &NormalizeOptions) -> Result<Vec<u8>, CodecError> {
        ImageRsProcessor::normalize(self, bitmap, opts)
    }
}

/// Encodes a bitmap, flattening transparency onto white first.
///
/// `quality` (`0.0..=1.0`) only affects JPEG; PNG and WebP are lossless.
pub fn encode(img: &DynamicImage, format: OutputFormat, quality: f32) -> Result<Vec<u8>, CodecError> {
    let rgb = flatten_on_white(img);
    let (w, h) = rgb.dimensions();
    let mut out = Vec::new();
    let mut cur = Cursor::new(&mut out);
    let fail = |e: image::ImageError| CodecError::Encode {
        format,
        reason: e.to_string(),
    };

    match format {
        OutputFormat::Jpeg => {
            let q = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            JpegEncoder::new_with_quality(&mut cur, q)
                .encode(rgb.as_raw(), w, h, ColorType::Rgb8.into())
                .map_err(fail)?;
        }
        OutputFormat::Png => {
            image::write_buffer_with_format(&mut cur, &rgb, w, h, ColorType::Rgb8, ImageFormat::Png)
                .map_err(fail)?;
        }
        OutputFormat::WebP => {
            let rgba = DynamicImage::ImageRgb8(rgb).to_rgba8();
            image::write_buffer_with_format(
                &mut cur,
                &rgba,
                w,
                h,
                ColorType::Rgba8,
                ImageFormat::WebP,
            )
            .map_err(fail)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::album::DeviceProfile;
    use image::{ImageBuffer, Rgba};

    fn make_png(w: u32, h: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, _> = ImageBuffer::from_fn(w, h, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        });
        let mut cur = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut cur,
            img.as_raw(),
            w,
            h,
            ColorType::Rgba8,
            ImageFormat::Png,
        )
        .expect("encode png");
        cur.into_inner()
    }

    fn jpeg_opts(max_side: u32) -> NormalizeOptions {
        NormalizeOptions::new(max_side, 0.78, OutputFormat::Jpeg)
    }

    #[test]
    fn supports_expected_mimes() {
        let p = ImageRsProcessor::default();
        assert!(p.supports("image/png"));
        assert!(p.supports("image/jpeg"));
        assert!(p.supports("image/jpg"));
        assert!(!p.supports("image/webp"));
        assert!(!p.supports("text/plain"));
        assert!(!p.supports("image/gif"));
    }

    #[test]
    fn decode_rejects_garbage() {
        let p = ImageRsProcessor::default();
        assert!(matches!(p.decode(b"definitely not pixels"), Err(CodecError::Decode(_))));
        assert!(p.decode(&[]).is_err());
    }

    #[test]
    fn normalize_outputs_jpeg_within_bounds() {
        let p = ImageRsProcessor::default();
        let bmp = p.decode(&make_png(2000, 1000)).unwrap();

        let out = p.normalize(&bmp, &jpeg_opts(1280)).expect("normalize ok");
        assert_eq!(&out[..3], &[0xFF, 0xD8, 0xFF]);

        let decoded = image::load_from_memory(&out).expect("decode jpeg");
        assert_eq!(decoded.dimensions(), (1280, 640));
    }

    #[test]
    fn normalize_never_upscales() {
        let p = ImageRsProcessor::default();
        let bmp = p.decode(&make_png(100, 50)).unwrap();
        let out = p.normalize(&bmp, &jpeg_opts(1280)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (100, 50));
    }

    #[test]
    fn normalize_bounds_hold_across_sizes() {
        let p = ImageRsProcessor::default();
        for (w, h) in [(1, 1), (641, 2), (3, 900), (640, 640), (1000, 999)] {
            let bmp = DynamicImage::new_rgb8(w, h);
            let out = p.normalize(&bmp, &jpeg_opts(640)).unwrap();
            let (rw, rh) = image::load_from_memory(&out).unwrap().dimensions();
            assert!(rw.max(rh) <= 640, "{w}x{h} -> {rw}x{rh}");
            assert!(rw <= w && rh <= h, "{w}x{h} upscaled to {rw}x{rh}");
        }
    }

    #[test]
    fn normalize_crops_to_ratio_before_scaling() {
        let p = ImageRsProcessor::default();
        let bmp = p.decode(&make_png(3000, 3000)).unwrap();
        let opts = jpeg_opts(1280).with_target_ratio(2.0 / 3.0);
        let out = p.normalize(&bmp, &opts).unwrap();
        let (w, h) = image::load_from_memory(&out).unwrap().dimensions();
        assert_eq!((w, h), (853, 1280));
    }

    #[test]
    fn png_and_webp_outputs_decode() {
        let p = ImageRsProcessor::default();
        let bmp = p.decode(&make_png(40, 30)).unwrap();
        for fmt in [OutputFormat::Png, OutputFormat::WebP] {
            let out = p.normalize(&bmp, &NormalizeOptions::new(20, 0.5, fmt)).unwrap();
            let decoded = image::load_from_memory(&out).expect("decodes");
            assert_eq!(decoded.dimensions(), (20, 15), "{fmt:?}");
        }
    }

    #[test]
    fn mobile_profile_is_no_larger_than_desktop_jpeg() {
        let p = ImageRsProcessor::default();
        let bmp = DynamicImage::ImageRgb8(image::RgbImage::from_fn(640, 960, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x ^ y) % 256) as u8])
        }));

        let mobile = DeviceProfile::Mobile.compress_options(p.supports("image/webp"));
        assert_eq!(mobile.format, OutputFormat::Jpeg);
        let mobile_out = p.normalize(&bmp, &mobile).unwrap();

        let desktop = DeviceProfile::Desktop.compress_options(p.supports("image/webp"));
        let desktop_out = p
            .normalize(&bmp, &NormalizeOptions::new(mobile.max_side, desktop.quality, desktop.format))
            .unwrap();

        assert!(
            mobile_out.len() <= desktop_out.len(),
            "mobile {} > desktop {}",
            mobile_out.len(),
            desktop_out.len()
        );
    }
}
