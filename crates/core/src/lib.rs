//! Shared primitives for the IAM assignment-graph crates.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::UserIdentity;

/// Result type used across the IAM graph crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
///
/// Every variant is terminal for the interaction that produced it; nothing in
/// the core retries automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Interaction cannot start: unsaved subject, empty selection, root selected.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Invalid input or violated invariant (duplicate assignment, non-unique name).
    #[error("validation error: {0}")]
    Validation(String),

    /// A click or selection refers to a snapshot that has been re-rendered since.
    #[error("stale reference: {0}")]
    StaleReference(String),

    /// The backing store rejected or failed a remote call.
    #[error("remote failure: {0}")]
    Remote(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error, including broken graph invariants.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns true for errors detected locally before any remote call.
    #[must_use]
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            Self::Precondition(_) | Self::Validation(_) | Self::StaleReference(_)
        )
    }
}
