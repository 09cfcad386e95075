//! # Render Configuration
//!
//! Collage canvas sizes, banner texts, the optional banner font and the
//! timezone used for export dates.
//!
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `KEEPSAKE_TITLE` | Banner title | `Um aninho de Heitor!` |
//! | `KEEPSAKE_SUBTITLE` | Banner subtitle | `Meu álbum` |
//! | `KEEPSAKE_FONT_PATH` | TrueType font for banner text | *none* |
//! | `KEEPSAKE_TIMEZONE` | IANA timezone for export dates | `America/Sao_Paulo` |
//! | `KEEPSAKE_COLLAGE_NAME` | Download name of the collage | `album-heitor.jpg` |
//! | `KEEPSAKE_DOCUMENT_NAME` | Download name of the PDF | `album-heitor.pdf` |
//! | `KEEPSAKE_COLLAGE_WIDTH` / `_HEIGHT` / `_QUALITY` | Desktop collage canvas | `1200` / `1800` / `0.92` |
//! | `KEEPSAKE_MOBILE_COLLAGE_WIDTH` / `_HEIGHT` / `_QUALITY` | First mobile collage attempt | `900` / `1350` / `0.9` |
//!
//! The mobile retry size (720x1080 at 0.85) is fixed.

use std::path::PathBuf;

use crate::config::album::DeviceProfile;
use crate::config::env::{read_f32_from, read_string_from, read_u32_from};

pub const DEFAULT_TITLE: &str = "Um aninho de Heitor!";
pub const DEFAULT_SUBTITLE: &str = "Meu álbum";
pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_COLLAGE_NAME: &str = "album-heitor.jpg";
pub const DEFAULT_DOCUMENT_NAME: &str = "album-heitor.pdf";

/// Output size and JPEG quality of one collage attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub quality: f32,
}

impl CanvasSpec {
    pub const DESKTOP: Self = Self {
        width: 1200,
        height: 1800,
        quality: 0.92,
    };
    pub const MOBILE: Self = Self {
        width: 900,
        height: 1350,
        quality: 0.9,
    };
    /// Second, smaller attempt after a failed mobile render.
    pub const MOBILE_RETRY: Self = Self {
        width: 720,
        height: 1080,
        quality: 0.85,
    };

    /// Reads `{prefix}_WIDTH`, `{prefix}_HEIGHT` and `{prefix}_QUALITY`.
    fn from_provider<F>(provider: &F, prefix: &str, default: Self) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            width: read_u32_from(provider, &format!("{prefix}_WIDTH"), default.width),
            height: read_u32_from(provider, &format!("{prefix}_HEIGHT"), default.height),
            quality: read_f32_from(provider, &format!("{prefix}_QUALITY"), default.quality)
                .clamp(0.0, 1.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub title: String,
    pub subtitle: String,
    pub font_path: Option<PathBuf>,
    pub timezone: String,
    pub collage_name: String,
    pub document_name: String,
    pub collage: CanvasSpec,
    pub mobile_collage: CanvasSpec,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            subtitle: DEFAULT_SUBTITLE.into(),
            font_path: None,
            timezone: DEFAULT_TIMEZONE.into(),
            collage_name: DEFAULT_COLLAGE_NAME.into(),
            document_name: DEFAULT_DOCUMENT_NAME.into(),
            collage: CanvasSpec::DESKTOP,
            mobile_collage: CanvasSpec::MOBILE,
        }
    }
}

impl RenderConfig {
    pub fn from_env() -> Self {
        Self::from_provider(|k| std::env::var(k).ok())
    }

    pub fn from_provider<F>(provider: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let font = read_string_from(&provider, "KEEPSAKE_FONT_PATH", "");
        Self {
            title: read_string_from(&provider, "KEEPSAKE_TITLE", DEFAULT_TITLE),
            subtitle: read_string_from(&provider, "KEEPSAKE_SUBTITLE", DEFAULT_SUBTITLE),
            font_path: (!font.is_empty()).then(|| PathBuf::from(font)),
            timezone: read_string_from(&provider, "KEEPSAKE_TIMEZONE", DEFAULT_TIMEZONE),
            collage_name: read_string_from(&provider, "KEEPSAKE_COLLAGE_NAME", DEFAULT_COLLAGE_NAME),
            document_name: read_string_from(
                &provider,
                "KEEPSAKE_DOCUMENT_NAME",
                DEFAULT_DOCUMENT_NAME,
            ),
            collage: CanvasSpec::from_provider(&provider, "KEEPSAKE_COLLAGE", CanvasSpec::DESKTOP),
            mobile_collage: CanvasSpec::from_provider(
                &provider,
                "KEEPSAKE_MOBILE_COLLAGE",
                CanvasSpec::MOBILE,
            ),
        }
    }

    /// Collage sizes to try, in order.
    pub fn collage_attempts(&self, device: DeviceProfile) -> Vec<CanvasSpec> {
        match device {
            DeviceProfile::Desktop => vec![self.collage],
            DeviceProfile::Mobile => vec![self.mobile_collage, CanvasSpec::MOBILE_RETRY],
        }
    }
}
