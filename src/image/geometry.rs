//! Rectangle-fitting math shared by the codec and the renderers.
//!
//! Everything here works on plain pixel dimensions so it can be unit-tested
//! without allocating images.

use image::GenericImageView;
use serde::{Deserialize, Serialize};

use super::processor::Bitmap;

/// Photo orientation, derived once from decoded pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape iff `width >= height`.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width >= height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Crop ratio (width / height) for a photo with this orientation, given
    /// the portrait ratio of the print (e.g. `2/3` for 10x15).
    pub fn target_ratio(&self, portrait_ratio: f32) -> f32 {
        match self {
            Self::Portrait => portrait_ratio,
            Self::Landscape => 1.0 / portrait_ratio,
        }
    }
}

/// Detects the orientation of a decoded bitmap.
pub fn detect_orientation(bitmap: &Bitmap) -> Orientation {
    let (w, h) = bitmap.dimensions();
    Orientation::from_dimensions(w, h)
}

/// Result of a "contain" fit: scaled size plus the offset that centers it
/// inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fit {
    pub w: u32,
    pub h: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Scales `source` to fit entirely inside `box`, preserving aspect ratio,
/// and centers it. Never crops; may upscale.
pub fn fit_within(source_w: u32, source_h: u32, box_w: u32, box_h: u32) -> Fit {
    if source_w == 0 || source_h == 0 || box_w == 0 || box_h == 0 {
        return Fit {
            w: 0,
            h: 0,
            offset_x: box_w / 2,
            offset_y: box_h / 2,
        };
    }
    let scale = contain_scale(source_w as f64, source_h as f64, box_w as f64, box_h as f64);
    let w = ((source_w as f64 * scale).round() as u32).clamp(1, box_w);
    let h = ((source_h as f64 * scale).round() as u32).clamp(1, box_h);
    Fit {
        w,
        h,
        offset_x: ((box_w - w) as f64 / 2.0).round() as u32,
        offset_y: ((box_h - h) as f64 / 2.0).round() as u32,
    }
}

/// Scale factor that makes `source` fit entirely inside the box ("contain"
/// fit). Shared by raster and PDF placement.
pub fn contain_scale(source_w: f64, source_h: f64, box_w: f64, box_h: f64) -> f64 {
    if source_w <= 0.0 || source_h <= 0.0 {
        return 1.0;
    }
    (box_w / source_w).min(box_h / source_h)
}

/// Scale factor that makes `source` cover the whole box ("cover" fit).
pub fn cover_scale(source_w: f64, source_h: f64, box_w: f64, box_h: f64) -> f64 {
    if source_w <= 0.0 || source_h <= 0.0 {
        return 1.0;
    }
    (box_w / source_w).max(box_h / source_h)
}

/// Smallest canvas that contains a `w x h` rectangle rotated by `degrees`.
///
/// `newW = |w·cos θ| + |h·sin θ|`, `newH = |w·sin θ| + |h·cos θ|`, rounded up
/// after absorbing floating-point noise so quarter turns stay exact.
pub fn rotated_bounds(w: u32, h: u32, degrees: f64) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (w as f64, h as f64);
    let nw = w * cos + h * sin;
    let nh = w * sin + h * cos;
    let snap = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    (snap(nw), snap(nh))
}

/// A sub-rectangle of an image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Centered crop of a `w x h` source to `ratio` (width / height).
///
/// Returns the whole source when the ratio already matches or is not a
/// positive finite number.
pub fn crop_to_ratio(w: u32, h: u32, ratio: f32) -> PixelRect {
    let full = PixelRect { x: 0, y: 0, w, h };
    if !(ratio.is_finite() && ratio > 0.0) || w == 0 || h == 0 {
        return full;
    }
    let ratio = ratio as f64;
    let current = w as f64 / h as f64;
    if current > ratio {
        let sw = ((h as f64 * ratio).round() as u32).clamp(1, w);
        PixelRect {
            x: ((w - sw) as f64 / 2.0).round() as u32,
            y: 0,
            w: sw,
            h,
        }
    } else if current < ratio {
        let sh = ((w as f64 / ratio).round() as u32).clamp(1, h);
        PixelRect {
            x: 0,
            y: ((h - sh) as f64 / 2.0).round() as u32,
            w,
            h: sh,
        }
    } else {
        full
    }
}

/// Output dimensions after bounding the largest side by `max_side`.
/// Never upscales.
pub fn downscale_dims(w: u32, h: u32, max_side: u32) -> (u32, u32) {
    let biggest = w.max(h);
    if max_side == 0 || biggest <= max_side {
        return (w, h);
    }
    let scale = max_side as f64 / biggest as f64;
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_side);
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_side);
    (nw, nh)
}
