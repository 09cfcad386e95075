//! Mapping of storage keys onto file names.

use super::error::StoreError;

/// Turns a record or blob key into a single safe path component.
///
/// ASCII alphanumerics, `-`, `_` and `.` are kept; anything else becomes
/// `_`. Empty keys and the `.`/`..` components are rejected.
pub fn file_stem(key: &str) -> Result<String, StoreError> {
    let key = key.trim();
    if key.is_empty() || key == "." || key == ".." {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect())
}
