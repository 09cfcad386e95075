//! # Application Configuration Loader
//!
//! Aggregates the album, storage and render settings.
//!
//! Automatically loads `.env` files for non-production environments.
//! It checks for a custom `DOTENV_FILE` path first, then falls back to
//! `.env.{APP_ENV}` or `.env`.
//!
//! # Environment Variables
//! | Variable | Description | Default |
//! |-----------|-------------|----------|
//! | `APP_ENV` | Current environment (`development`, `production`, etc.) | `"development"` |
//! | `DOTENV_FILE` | Optional path to a custom dotenv file | *none* |
//!
//! See [`AlbumConfig`], [`StorageConfig`] and [`RenderConfig`] for the rest.
//!
//! # Example
//! ```rust,no_run
//! use keepsake::config::app::AppConfig;
//!
//! let cfg = AppConfig::from_env();
//! println!("album holds up to {} photos", cfg.album.max_photos);
//! ```

use std::env;

use crate::config::{album::AlbumConfig, render::RenderConfig, storage::StorageConfig};

/// Top-level application configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Value of `APP_ENV`.
    pub app_env: String,
    pub album: AlbumConfig,
    pub storage: StorageConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// Loads application configuration from environment variables.
    ///
    /// ## Behavior
    /// - Reads `APP_ENV` (defaults to `"development"`).
    /// - Loads `.env` or `.env.{APP_ENV}` for non-production environments.
    /// - Parses all supported environment variables and falls back to defaults.
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != "production" {
            if let Ok(path) = env::var("DOTENV_FILE") {
                let _ = dotenvy::from_filename(path);
            } else {
                let candidate = format!(".env.{}", app_env);
                dotenvy::from_filename(&candidate)
                    .or_else(|_| dotenvy::dotenv())
                    .ok();
            }
        }

        AppConfig {
            app_env,
            album: AlbumConfig::from_env(),
            storage: StorageConfig::from_env(),
            render: RenderConfig::from_env(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::album::DeviceProfile;

    #[test]
    fn from_env_reads_sections() {
        temp_env::with_vars(
            vec![
                ("APP_ENV", Some("production")),
                ("KEEPSAKE_MAX_PHOTOS", Some("6")),
                ("KEEPSAKE_DEVICE", Some("mobile")),
                ("KEEPSAKE_DATA_DIR", Some("/srv/keepsake")),
                ("KEEPSAKE_TITLE", Some("Festa")),
            ],
            || {
                let cfg = AppConfig::from_env();
                assert!(cfg.is_production());
                assert_eq!(cfg.album.max_photos, 6);
                assert_eq!(cfg.album.device, DeviceProfile::Mobile);
                assert_eq!(cfg.storage.data_dir.to_str(), Some("/srv/keepsake"));
                assert_eq!(cfg.render.title, "Festa");
            },
        );
    }

    #[test]
    fn dotenv_file_is_loaded_outside_production() {
        let path = std::env::temp_dir().join(format!("keepsake-dotenv-{}", std::process::id()));
        std::fs::write(&path, "KEEPSAKE_SUBTITLE=Do arquivo\n").unwrap();

        temp_env::with_vars(
            vec![
                ("APP_ENV", Some("development")),
                ("DOTENV_FILE", Some(path.to_str().unwrap())),
                ("KEEPSAKE_SUBTITLE", None),
            ],
            || {
                let cfg = AppConfig::from_env();
                assert!(!cfg.is_production());
                assert_eq!(cfg.render.subtitle, "Do arquivo");
            },
        );

        let _ = std::fs::remove_file(&path);
    }
}
