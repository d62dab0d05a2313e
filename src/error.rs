//! Error taxonomy shared by the persistence and catalog layers.
//!
//! The library layers return [`CatalogError`] so callers can tell an expected
//! miss apart from a bad input or a broken store. The binary and the TUI wrap
//! these in `anyhow` for reporting.

use rusqlite::ErrorCode;

/// Result alias used across `db` and `catalog`.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A lookup by identifier found no row. Workflows that depend on the row
    /// abort with this; plain lookups return `None` instead.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A required value was missing or rejected by a schema constraint.
    #[error("{0}")]
    ConstraintViolation(String),

    /// The SQLite file could not be opened, read, or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[source] rusqlite::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }
}

impl From<rusqlite::Error> for CatalogError {
    /// SQLite reports NOT NULL, CHECK, and FOREIGN KEY failures under the same
    /// extended code family, so all of them become `ConstraintViolation`.
    fn from(err: rusqlite::Error) -> Self {
        if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
            CatalogError::ConstraintViolation(err.to_string())
        } else {
            CatalogError::StorageUnavailable(err)
        }
    }
}

/// Reject names that are empty once trimmed, returning the trimmed value.
pub(crate) fn require_name(entity: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(CatalogError::constraint(format!("{entity} name is required.")))
    } else {
        Ok(trimmed.to_string())
    }
}
