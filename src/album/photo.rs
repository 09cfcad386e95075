//! The photo entity and the upload value object.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::handles::DisplayHandle;
use crate::image::geometry::Orientation;
use crate::store::{data_url::encode_data_url, photo_store::PhotoRecord};
use crate::time::local::to_epoch_millis;

/// Opaque photo identifier, unique within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// A fresh random (v4) id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PhotoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PhotoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-selected file.
#[derive(Debug, Clone)]
pub struct Upload {
    /// MIME type reported by the picker.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Only the `image/` prefix is checked; the codec decides the rest.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }
}

/// A photo in the collection.
///
/// `pixels` is the normalised, compressed image. `orientation` is fixed when
/// the pixels are captured (add or swap) and never recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub created_at: DateTime<Utc>,
    pub orientation: Orientation,
    pub pixels: Arc<[u8]>,
    pub content_type: String,
    pub blob_id: String,
    /// Session-only display handle.
    pub handle: DisplayHandle,
}

impl Photo {
    /// Metadata record for persistence. `inline` embeds the pixels as a
    /// `data:` URL.
    pub fn to_record(&self, inline: bool) -> PhotoRecord {
        PhotoRecord {
            id: self.id.to_string(),
            created_at: to_epoch_millis(self.created_at),
            orientation: self.orientation,
            blob_id: Some(self.blob_id.clone()),
            data_url: inline.then(|| encode_data_url(&self.content_type, &self.pixels)),
        }
    }
}

/// Best-effort MIME type of encoded image bytes.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        _ => "image/jpeg",
    }
}
