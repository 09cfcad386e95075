use thiserror::Error;

/// A requested entity (a photo, a stored blob...) does not exist.
///
/// # Example
/// ```
/// use keepsake::error::entity::NotFoundError;
///
/// let err = NotFoundError::new("Photo", "3f1c");
/// assert_eq!(err.to_string(), "Photo 3f1c not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of entity, e.g. `"Photo"`.
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}

impl NotFoundError {
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        Self {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a missing photo.
    pub fn photo(id: impl Into<String>) -> Self {
        Self::new("Photo", id)
    }
}
