//! # Image Codec Abstractions
//!
//! Defines the codec port used by the photo collection and the options that
//! drive photo normalisation.
//!
//! This module provides:
//! - [`OutputFormat`]: the raster formats a normalised photo can be encoded to.
//! - [`NormalizeOptions`]: crop ratio, size bound, quality and format.
//! - [`CodecError`]: decode/encode failures.
//! - [`ImageProcessor`]: a trait abstraction over the codec backend, so the
//!   collection manager can be exercised with stub codecs in tests.
//!
//! # Example
//! ```rust
//! use keepsake::image::processor::{NormalizeOptions, OutputFormat};
//!
//! let opts = NormalizeOptions::new(1280, 0.78, OutputFormat::Jpeg).with_target_ratio(2.0 / 3.0);
//! assert_eq!(opts.max_side, 1280);
//! assert_eq!(opts.target_ratio, Some(2.0 / 3.0));
//! assert_eq!(opts.format.content_type(), "image/jpeg");
//! ```

use image::DynamicImage;
use thiserror::Error;

/// A decoded, in-memory raster.
pub type Bitmap = DynamicImage;

/// Encoded output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    /// MIME type of the encoded output.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Parses a MIME type (case-insensitive). `image/jpg` is accepted as JPEG.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }
}

/// Options for [`ImageProcessor::normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Largest allowed side of the output, in pixels.
    pub max_side: u32,
    /// Width / height ratio to center-crop to before scaling.
    pub target_ratio: Option<f32>,
    /// Encoder quality in `0.0..=1.0`. Ignored by lossless formats.
    pub quality: f32,
    pub format: OutputFormat,
}

impl NormalizeOptions {
    pub fn new(max_side: u32, quality: f32, format: OutputFormat) -> Self {
        Self {
            max_side,
            target_ratio: None,
            quality,
            format,
        }
    }

    /// Returns a copy that center-crops to `ratio` (width / height).
    pub fn with_target_ratio(mut self, ratio: f32) -> Self {
        self.target_ratio = Some(ratio);
        self
    }
}

/// Codec failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not a decodable image.
    #[error("unreadable image: {0}")]
    Decode(String),
    #[error("failed to encode {format:?}: {reason}")]
    Encode {
        format: OutputFormat,
        reason: String,
    },
    #[error("invalid image: {0}")]
    Invalid(String),
}

/// Codec port.
///
/// Implementors decode uploads and produce size-bounded, re-encoded photos.
/// Decoding must fail with [`CodecError::Decode`] on corrupt or non-image
/// input rather than panic.
pub trait ImageProcessor: Send + Sync {
    /// Returns `true` if the backend can encode to the given MIME type.
    fn supports(&self, content_type: &str) -> bool;

    /// Decodes raw bytes into a [`Bitmap`].
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, CodecError>;

    /// Center-crops (when a ratio is set), downsizes (never upsizes) and
    /// re-encodes `bitmap`.
    fn normalize(&self, bitmap: &Bitmap, opts: &NormalizeOptions) -> Result<Vec<u8>, CodecError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockImageProcessor {
        calls: Mutex<Vec<NormalizeOptions>>,
    }

    impl ImageProcessor for MockImageProcessor {
        fn supports(&self, content_type: &str) -> bool {
            OutputFormat::from_content_type(content_type).is_some()
        }

        fn decode(&self, bytes: &[u8]) -> Result<Bitmap, CodecError> {
            if bytes.is_empty() {
                return Err(CodecError::Decode("empty".into()));
            }
            Ok(Bitmap::new_rgb8(2, 1))
        }

        fn normalize(&self, _bitmap: &Bitmap, opts: &NormalizeOptions) -> Result<Vec<u8>, CodecError> {
            self.calls.lock().unwrap().push(*opts);
            Ok(b"encoded".to_vec())
        }
    }

    #[test]
    fn content_type_round_trips_through_format() {
        for fmt in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::WebP] {
            assert_eq!(OutputFormat::from_content_type(fmt.content_type()), Some(fmt));
        }
        assert_eq!(OutputFormat::from_content_type("IMAGE/JPG"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::from_content_type("image/gif"), None);
        assert_eq!(OutputFormat::WebP.extension(), "webp");
    }

    #[test]
    fn normalize_options_builder() {
        let o = NormalizeOptions::new(640, 0.62, OutputFormat::WebP);
        assert_eq!(o.target_ratio, None);
        let o2 = o.with_target_ratio(1.5);
        assert_eq!(o2.target_ratio, Some(1.5));
        assert_eq!(o2.max_side, 640);
    }

    #[test]
    fn mock_processor_through_trait_object() {
        let mock = Arc::new(MockImageProcessor::default());
        let proc_obj: Arc<dyn ImageProcessor> = mock.clone();

        assert!(proc_obj.supports("image/png"));
        assert!(!proc_obj.supports("text/plain"));
        assert!(matches!(proc_obj.decode(b""), Err(CodecError::Decode(_))));

        let bmp = proc_obj.decode(b"x").unwrap();
        let opts = NormalizeOptions::new(10, 0.5, OutputFormat::Png);
        assert_eq!(proc_obj.normalize(&bmp, &opts).unwrap(), b"encoded");
        assert_eq!(mock.calls.lock().unwrap().as_slice(), &[opts]);
    }

    fn assert_send_sync<T: ?Sized + Send + Sync>() {}
    #[test]
    fn dyn_image_processor_is_send_sync() {
        assert_send_sync::<dyn ImageProcessor>();
    }
}
