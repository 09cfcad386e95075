//! # Album Export
//!
//! Turns the current collection into downloadable [`Artifact`]s: a JPEG
//! collage or a paginated PDF of framed cards. Like the manager, the
//! exporter is an action boundary: failures raise a user notice and come
//! back as [`AlbumError`].
//!
//! On mobile the collage is attempted at a reduced size first and retried
//! once at an even smaller size; a final failure is reported as low memory.

use std::sync::Arc;

use chrono_tz::Tz;
use tracing::{info, warn};

use super::photo::Photo;
use crate::artifact::storage::Artifact;
use crate::config::album::DeviceProfile;
use crate::config::render::{CanvasSpec, RenderConfig};
use crate::error::album::AlbumError;
use crate::image::processor::{Bitmap, ImageProcessor, OutputFormat};
use crate::notification::notice::Notice;
use crate::notification::notifier::Notifier;
use crate::render::collage::{CollageOptions, render_collage_jpeg};
use crate::render::document::{DocumentOptions, build_document};
use crate::render::error::RenderError;
use crate::render::frame::{make_framed_card, palette_color};
use crate::render::text::BannerFont;
use crate::time::clock::Clock;
use crate::time::local::{format_local_date, parse_timezone};

/// JPEG quality of the cards embedded in the PDF.
pub const DOCUMENT_CARD_QUALITY: f32 = 0.9;
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub struct AlbumExporter {
    render: RenderConfig,
    device: DeviceProfile,
    attempts: Vec<CanvasSpec>,
    timezone: Tz,
    font: Option<BannerFont>,
    codec: Arc<dyn ImageProcessor>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl AlbumExporter {
    /// Builds an exporter from configuration.
    ///
    /// A configured font that cannot be loaded is logged and skipped: the
    /// collage banner is then drawn without text.
    ///
    /// # Errors
    /// Fails when the configured timezone is not a valid IANA name.
    pub fn new(
        render: RenderConfig,
        device: DeviceProfile,
        codec: Arc<dyn ImageProcessor>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> anyhow::Result<Self> {
        let timezone = parse_timezone(&render.timezone)?;
        let font = render.font_path.as_deref().and_then(|path| {
            BannerFont::load(path)
                .map_err(|e| warn!(error = %e, "banner font unavailable, drawing without text"))
                .ok()
        });
        Ok(Self {
            attempts: render.collage_attempts(device),
            render,
            device,
            timezone,
            font,
            codec,
            clock,
            notifier,
        })
    }

    /// Overrides the collage sizes to try, in order.
    pub fn with_collage_attempts(mut self, attempts: Vec<CanvasSpec>) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_font(mut self, font: Option<BannerFont>) -> Self {
        self.font = font;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn decode_all(&self, photos: &[Photo]) -> Result<Vec<Bitmap>, RenderError> {
        photos
            .iter()
            .map(|p| self.codec.decode(&p.pixels).map_err(RenderError::from))
            .collect()
    }

    fn collage_bytes(&self, photos: &[Photo]) -> Result<Vec<u8>, RenderError> {
        let bitmaps = self.decode_all(photos)?;
        let mut last = RenderError::Empty;
        for (i, canvas) in self.attempts.iter().enumerate() {
            let opts = CollageOptions::new(*canvas, &self.render.title, &self.render.subtitle)
                .with_font(self.font.as_ref());
            match render_collage_jpeg(&bitmaps, &opts) {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!(
                        attempt = i + 1,
                        width = canvas.width,
                        height = canvas.height,
                        error = %e,
                        "collage attempt failed"
                    );
                    last = e;
                }
            }
        }
        Err(last)
    }

    fn document_bytes(&self, photos: &[Photo]) -> Result<Vec<u8>, RenderError> {
        let cards: Vec<Bitmap> = self
            .decode_all(photos)?
            .iter()
            .enumerate()
            .map(|(i, bitmap)| make_framed_card(bitmap, palette_color(i)))
            .collect();
        let date = format_local_date(self.clock.now(), &self.timezone);
        let opts = DocumentOptions {
            title: &self.render.title,
            subtitle: &self.render.subtitle,
            date_label: &date,
            quality: DOCUMENT_CARD_QUALITY,
        };
        build_document(&cards, &opts)
    }

    /// Raises the empty-album notice and returns the matching error.
    async fn reject_empty(&self) -> AlbumError {
        self.notifier.notify(Notice::EmptyAlbum).await;
        RenderError::Empty.into()
    }

    async fn report_failure(&self, e: RenderError) -> AlbumError {
        let notice = if self.device.is_mobile() {
            Notice::LowMemory
        } else {
            Notice::RenderFailed
        };
        self.notifier.notify(notice).await;
        e.into()
    }

    /// Renders the collage as a JPEG artifact.
    pub async fn collage(&self, photos: &[Photo]) -> Result<Artifact, AlbumError> {
        if photos.is_empty() {
            return Err(self.reject_empty().await);
        }
        match self.collage_bytes(photos) {
            Ok(bytes) => {
                info!(photos = photos.len(), bytes = bytes.len(), "collage exported");
                Ok(Artifact::new(
                    self.render.collage_name.clone(),
                    OutputFormat::Jpeg.content_type(),
                    bytes,
                ))
            }
            Err(e) => Err(self.report_failure(e).await),
        }
    }

    /// Renders every photo as a framed card into a paginated PDF.
    pub async fn document(&self, photos: &[Photo]) -> Result<Artifact, AlbumError> {
        if photos.is_empty() {
            return Err(self.reject_empty().await);
        }
        match self.document_bytes(photos) {
            Ok(bytes) => {
                info!(photos = photos.len(), bytes = bytes.len(), "document exported");
                Ok(Artifact::new(
                    self.render.document_name.clone(),
                    PDF_CONTENT_TYPE,
                    bytes,
                ))
            }
            Err(e) => Err(self.report_failure(e).await),
        }
    }
}
