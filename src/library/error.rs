//! Domain rule violations with user-facing messages

use thiserror::Error;

/// Errors raised by [`Library`](super::Library) operations.
///
/// Every operation checks before it mutates, so the catalog is unchanged
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or blank
    #[error("{0}")]
    Validation(String),

    /// Uniqueness or capacity violation
    #[error("{0}")]
    Conflict(String),

    /// Operand is not part of the catalog, or the book is not held by the claimed user
    #[error("{0}")]
    Reference(String),
}

impl DomainError {
    pub(crate) fn required(field: &str) -> Self {
        DomainError::Validation(format!("The {field} is required."))
    }
}
