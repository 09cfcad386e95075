use thiserror::Error;

use crate::image::processor::CodecError;

/// Failures while composing cards, collages, booth photos or documents.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Nothing to render.
    #[error("no photos to render")]
    Empty,

    #[error("invalid canvas size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("font error: {0}")]
    Font(String),

    #[error("document error: {0}")]
    Document(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        Self::Document(e.to_string())
    }
}
