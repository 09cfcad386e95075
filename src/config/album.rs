//! # Album Configuration
//!
//! Collection limits, the metadata storage key, and the device profile that
//! selects the compression settings.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `KEEPSAKE_MAX_PHOTOS` | Collection capacity (1–6) | `4` |
//! | `KEEPSAKE_STORAGE_KEY` | Record key of the album metadata | `album_mvp_step_v6_collage_4_adaptive_2x3` |
//! | `KEEPSAKE_DEVICE` | `desktop` or `mobile` | `desktop` |
//!
//! # Example
//! ```rust
//! use keepsake::config::album::{AlbumConfig, DeviceProfile};
//! use keepsake::image::processor::OutputFormat;
//!
//! let cfg = AlbumConfig::default();
//! assert_eq!(cfg.max_photos, 4);
//!
//! let opts = DeviceProfile::Mobile.compress_options(true);
//! assert_eq!((opts.max_side, opts.format), (640, OutputFormat::WebP));
//! ```

use crate::config::env::{read_string_from, read_u32_from};
use crate::image::processor::{NormalizeOptions, OutputFormat};

pub const DEFAULT_STORAGE_KEY: &str = "album_mvp_step_v6_collage_4_adaptive_2x3";
pub const DEFAULT_MAX_PHOTOS: usize = 4;
/// Largest capacity any album flow supports.
pub const MAX_PHOTOS_LIMIT: usize = 6;
/// Width / height of a portrait 10x15 print.
pub const PHOTO_RATIO: f32 = 2.0 / 3.0;

/// Host class; mobile hosts get smaller, cheaper encodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceProfile {
    /// Parses `"mobile"` (case-insensitive); anything else is desktop.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("mobile") {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Self::Mobile)
    }

    /// Normalisation settings for captured photos.
    ///
    /// Mobile prefers WebP when the codec can produce it.
    pub fn compress_options(&self, webp_supported: bool) -> NormalizeOptions {
        match self {
            Self::Desktop => NormalizeOptions::new(1280, 0.78, OutputFormat::Jpeg),
            Self::Mobile => {
                let format = if webp_supported {
                    OutputFormat::WebP
                } else {
                    OutputFormat::Jpeg
                };
                NormalizeOptions::new(640, 0.62, format)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlbumConfig {
    pub max_photos: usize,
    pub storage_key: String,
    /// Portrait crop ratio; landscape photos use its inverse.
    pub photo_ratio: f32,
    pub device: DeviceProfile,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            max_photos: DEFAULT_MAX_PHOTOS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            photo_ratio: PHOTO_RATIO,
            device: DeviceProfile::Desktop,
        }
    }
}

impl AlbumConfig {
    pub fn from_env() -> Self {
        Self::from_provider(|k| std::env::var(k).ok())
    }

    /// Builds the config from an arbitrary variable provider.
    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_photos = read_u32_from(&provider, "KEEPSAKE_MAX_PHOTOS", DEFAULT_MAX_PHOTOS as u32)
            as usize;
        Self {
            max_photos: max_photos.clamp(1, MAX_PHOTOS_LIMIT),
            storage_key: read_string_from(&provider, "KEEPSAKE_STORAGE_KEY", DEFAULT_STORAGE_KEY),
            photo_ratio: PHOTO_RATIO,
            device: DeviceProfile::parse(&read_string_from(&provider, "KEEPSAKE_DEVICE", "desktop")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn provider(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AlbumConfig::from_provider(provider(&[]));
        assert_eq!(cfg, AlbumConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = AlbumConfig::from_provider(provider(&[
            ("KEEPSAKE_MAX_PHOTOS", "6"),
            ("KEEPSAKE_STORAGE_KEY", "other"),
            ("KEEPSAKE_DEVICE", "Mobile"),
        ]));
        assert_eq!(cfg.max_photos, 6);
        assert_eq!(cfg.storage_key, "other");
        assert_eq!(cfg.device, DeviceProfile::Mobile);
    }

    #[test]
    fn max_photos_is_clamped() {
        let cfg = AlbumConfig::from_provider(provider(&[("KEEPSAKE_MAX_PHOTOS", "50")]));
        assert_eq!(cfg.max_photos, MAX_PHOTOS_LIMIT);
        let cfg = AlbumConfig::from_provider(provider(&[("KEEPSAKE_MAX_PHOTOS", "0")]));
        assert_eq!(cfg.max_photos, 1);
    }

    #[test]
    fn compress_profiles() {
        let d = DeviceProfile::Desktop.compress_options(true);
        assert_eq!((d.max_side, d.quality, d.format), (1280, 0.78, OutputFormat::Jpeg));

        let m = DeviceProfile::Mobile.compress_options(false);
        assert_eq!((m.max_side, m.quality, m.format), (640, 0.62, OutputFormat::Jpeg));
    }
}
