//! Domain error taxonomy.
//!
//! Propagation policy: validation and conflict errors are never retried and
//! surface immediately; infrastructure errors on query-style reads degrade
//! to documented fallback values, while write paths surface them.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// An external collaborator (store, object storage, gateway) failed.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_includes_entity_and_id() {
        let err = CoreError::not_found("draft", 42);
        assert_eq!(err.to_string(), "Entity not found: draft with id 42");
    }

    #[test]
    fn validation_display() {
        let err = CoreError::Validation("file too large".into());
        assert_eq!(err.to_string(), "Validation failed: file too large");
    }
}
