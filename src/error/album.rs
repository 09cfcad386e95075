//! The album's error taxonomy.
//!
//! Every user-triggered action returns `Result<_, AlbumError>`. Lower-level
//! failures ([`CodecError`], [`StoreError`], [`RenderError`]) are folded
//! into the taxonomy by the `From` impls below.

use thiserror::Error;

use super::entity::NotFoundError;
use crate::image::processor::CodecError;
use crate::notification::notice::Notice;
use crate::render::error::RenderError;
use crate::store::error::StoreError;

#[derive(Debug, Error)]
pub enum AlbumError {
    /// The selected file's MIME type is not `image/*`.
    #[error("not an image: {content_type:?}")]
    NotAnImage { content_type: String },

    #[error("album is full ({max} photos)")]
    CapacityExceeded { max: usize },

    #[error("could not read image: {0}")]
    Decode(String),

    #[error("storage quota exceeded")]
    StorageQuotaExceeded,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("render failed: {0}")]
    RenderFailure(String),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

impl AlbumError {
    /// The notice shown for this error at an add action.
    ///
    /// Returns `None` when the failure has already been reported where it
    /// was detected (metadata writes raise their own storage notices).
    pub fn add_notice(&self, max_photos: usize) -> Option<Notice> {
        match self {
            Self::NotAnImage { .. } => Some(Notice::NotAnImage),
            Self::CapacityExceeded { .. } => Some(Notice::CapacityReached { max: max_photos }),
            Self::StorageQuotaExceeded | Self::StorageUnavailable(_) | Self::NotFound(_) => None,
            Self::Decode(_) | Self::RenderFailure(_) => Some(Notice::AddFailed),
        }
    }

    /// Like [`Self::add_notice`] for a swap action.
    pub fn swap_notice(&self) -> Option<Notice> {
        match self {
            Self::NotAnImage { .. } => Some(Notice::NotAnImage),
            Self::StorageQuotaExceeded
            | Self::StorageUnavailable(_)
            | Self::NotFound(_)
            | Self::CapacityExceeded { .. } => None,
            Self::Decode(_) | Self::RenderFailure(_) => Some(Notice::SwapFailed),
        }
    }
}

impl From<CodecError> for AlbumError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decode(_) | CodecError::Invalid(_) => Self::Decode(e.to_string()),
            CodecError::Encode { .. } => Self::RenderFailure(e.to_string()),
        }
    }
}

impl From<StoreError> for AlbumError {
    fn from(e: StoreError) -> Self {
        if e.is_quota() {
            Self::StorageQuotaExceeded
        } else {
            Self::StorageUnavailable(e.to_string())
        }
    }
}

impl From<RenderError> for AlbumError {
    fn from(e: RenderError) -> Self {
        Self::RenderFailure(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::OutputFormat;

    #[test]
    fn codec_errors_map_by_kind() {
        let e: AlbumError = CodecError::Decode("bad".into()).into();
        assert!(matches!(e, AlbumError::Decode(_)));

        let e: AlbumError = CodecError::Encode {
            format: OutputFormat::WebP,
            reason: "oom".into(),
        }
        .into();
        assert!(matches!(e, AlbumError::RenderFailure(_)));
    }

    #[test]
    fn store_quota_maps_to_quota_exceeded() {
        let e: AlbumError = StoreError::QuotaExceeded { needed: 2, quota: 1 }.into();
        assert!(matches!(e, AlbumError::StorageQuotaExceeded));

        let e: AlbumError = StoreError::Unavailable("gone".into()).into();
        assert!(matches!(e, AlbumError::StorageUnavailable(_)));
    }

    #[test]
    fn render_errors_become_render_failure() {
        let e: AlbumError = RenderError::Empty.into();
        assert_eq!(e.to_string(), "render failed: no photos to render");
    }

    #[test]
    fn notices_per_action() {
        let full = AlbumError::CapacityExceeded { max: 4 };
        assert_eq!(full.add_notice(4), Some(Notice::CapacityReached { max: 4 }));
        assert_eq!(AlbumError::StorageQuotaExceeded.add_notice(4), None);
        assert_eq!(
            AlbumError::Decode("x".into()).swap_notice(),
            Some(Notice::SwapFailed)
        );
        let not_image = AlbumError::NotAnImage {
            content_type: "text/plain".into(),
        };
        assert_eq!(not_image.swap_notice(), Some(Notice::NotAnImage));
    }
}
