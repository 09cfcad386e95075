//! # Environment Variable Utilities
//!
//! Helpers for reading environment variables with type conversion and
//! fallback defaults. Every reader has a `*_from` twin that takes a provider
//! closure, so configuration parsing can be tested without touching the
//! process environment.
//!
//! # Examples
//! ```rust,no_run
//! use keepsake::config::env::{read_flag, read_u32};
//!
//! let mobile = read_flag("KEEPSAKE_MOBILE", false);
//! let max_photos = read_u32("KEEPSAKE_MAX_PHOTOS", 4);
//! ```

/// Reads a boolean flag from an environment variable.
///
/// Returns `true` for any of the following case-insensitive values:
/// `"1"`, `"true"`, `"yes"`, `"on"`.
pub fn read_flag(name: &str, default: bool) -> bool {
    read_flag_from(|k| std::env::var(k).ok(), name, default)
}

/// Reads a boolean flag using a custom provider function.
///
/// # Example
/// ```rust
/// use keepsake::config::env::read_flag_from;
///
/// let val = read_flag_from(|_| Some("true".into()), "KEEPSAKE_MOBILE", false);
/// assert!(val);
/// ```
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => {
            let s = unquote(&v);
            matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
        }
        None => default,
    }
}

/// Reads a `u32` from an environment variable, returning `default` when the
/// variable is missing or unparsable.
pub fn read_u32(name: &str, default: u32) -> u32 {
    read_u32_from(|k| std::env::var(k).ok(), name, default)
}

/// Provider-based variant of [`read_u32`].
pub fn read_u32_from<F>(provider: F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| unquote(&s).parse::<u32>().ok())
        .unwrap_or(default)
}

/// Reads a finite `f32` from an environment variable.
pub fn read_f32(name: &str, default: f32) -> f32 {
    read_f32_from(|k| std::env::var(k).ok(), name, default)
}

/// Provider-based variant of [`read_f32`]. Non-finite values fall back to
/// `default`.
pub fn read_f32_from<F>(provider: F, name: &str, default: f32) -> f32
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| unquote(&s).parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Reads a non-empty string, trimming whitespace and surrounding quotes.
pub fn read_string(name: &str, default: &str) -> String {
    read_string_from(|k| std::env::var(k).ok(), name, default)
}

/// Provider-based variant of [`read_string`].
pub fn read_string_from<F>(provider: F, name: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .map(|s| unquote(&s).to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn unquote(v: &str) -> &str {
    v.trim().trim_matches(|c| c == '"' || c == '\'')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_flag_true_variants() {
        for val in ["1", "true", "TRUE", "yes", "YES", "on", "On"] {
            let got = read_flag_from(|_| Some(val.into()), "X", false);
            assert!(got, "Expected {val:?} to be truthy");
        }
    }

    #[test]
    fn test_read_flag_false_variants() {
        for val in ["0", "false", "no", "off", "xyz", ""] {
            let got = read_flag_from(|_| Some(val.into()), "X", true);
            assert!(!got, "Expected {val:?} to be falsy");
        }
    }

    #[test]
    fn test_read_flag_default_when_missing() {
        assert!(read_flag_from(|_| None, "X", true));
        assert!(!read_flag_from(|_| None, "X", false));
    }

    #[test]
    fn test_read_flag_strips_quotes() {
        assert!(read_flag_from(|_| Some("\"true\"".into()), "X", false));
        assert!(read_flag_from(|_| Some("'yes'".into()), "X", false));
    }

    #[test]
    fn test_read_u32_valid_and_invalid() {
        assert_eq!(read_u32_from(|_| Some(" 6 ".into()), "MAX", 4), 6);
        assert_eq!(read_u32_from(|_| Some("six".into()), "MAX", 4), 4);
        assert_eq!(read_u32_from(|_| None, "MAX", 4), 4);
    }

    #[test]
    fn test_read_f32_rejects_non_finite() {
        assert_eq!(read_f32_from(|_| Some("0.62".into()), "Q", 0.78), 0.62);
        assert_eq!(read_f32_from(|_| Some("NaN".into()), "Q", 0.78), 0.78);
        assert_eq!(read_f32_from(|_| Some("inf".into()), "Q", 0.78), 0.78);
    }

    #[test]
    fn test_read_string_empty_falls_back() {
        assert_eq!(read_string_from(|_| Some("  ".into()), "T", "dflt"), "dflt");
        assert_eq!(read_string_from(|_| Some("'Meu álbum'".into()), "T", "x"), "Meu álbum");
    }
}
