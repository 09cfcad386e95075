//! # keepsake
//!
//! A bounded photo album with persistent storage and printable exports.
//!
//! This crate provides:
//! - Photo normalisation (crop, downscale, re-encode, EXIF orientation) (`image`)
//! - A persistent photo store with a blob backend and an inline fallback (`store`)
//! - The album manager: add, swap, remove, clear, hydrate (`album`)
//! - Collage, framed-card PDF and photo booth rendering (`render`)
//! - Artifact storage for exported files (`artifact`)
//! - Re-exports of frequently used utility crates (`chrono`, `image`, `uuid`, etc.)
//!
//! ## Example usage (in another crate)
//!
//! ```rust
//! use std::sync::Arc;
//! use keepsake::album::session::AlbumSession;
//! use keepsake::anyhow::Result;
//! use keepsake::config::app::AppConfig;
//! use keepsake::notification::notifier::{AutoConfirm, LogNotifier};
//!
//! async fn boot() -> Result<AlbumSession> {
//!     let cfg = AppConfig::from_env();
//!     AlbumSession::open(&cfg, Arc::new(LogNotifier), Arc::new(AutoConfirm(true))).await
//! }
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use base64;
pub use chrono;
pub use chrono_tz;
pub use dotenvy;
pub use ::image as image_rs;
pub use lopdf;
pub use serde;
pub use serde_json;
pub use tokio;
pub use uuid;

// ===============================
// Public modules
// ===============================
pub mod album;
pub mod artifact;
pub mod config;
pub mod error;
pub mod image;
pub mod notification;
pub mod render;
pub mod store;
pub mod time;
