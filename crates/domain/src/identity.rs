//! Canonical identifiers for Facultades, Roles and assignment edges.

use chrono::{DateTime, Utc};
use iam_graph_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Backing-store identity of a persisted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Creates a backing-store identifier. Zero and negative values are rejected.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "entity id must be positive, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Business identifier of a Rol (`idRol`), unique and positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdRol(i64);

impl IdRol {
    /// Creates a role business identifier. Zero and negative values are rejected.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "idRol must be a positive integer, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for IdRol {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Case-sensitive Facultad name. Assignment edges are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FacultadName(NonEmptyString);

impl FacultadName {
    /// Creates a Facultad name. Empty and whitespace-only names are rejected.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::new(value)
            .map(Self)
            .map_err(|_| AppError::Validation("facultad name must not be empty".to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FacultadName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FacultadName> for String {
    fn from(value: FacultadName) -> Self {
        value.0.into()
    }
}

impl std::fmt::Display for FacultadName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Who last modified an entity, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// Subject of the user that performed the last change.
    pub last_modified_by: String,
    /// Timestamp of the last change.
    pub last_modified_at: DateTime<Utc>,
}

impl AuditStamp {
    /// Creates a stamp for a change performed now by `subject`.
    #[must_use]
    pub fn now(subject: impl Into<String>) -> Self {
        Self {
            last_modified_by: subject.into(),
            last_modified_at: Utc::now(),
        }
    }
}

/// Outcome of a uniqueness decision that can be made without the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalUniqueness {
    /// The value is unchanged from the previously loaded one, so it is valid.
    Unchanged,
    /// The value must be checked against the backing store.
    NeedsRemoteCheck,
}

impl LocalUniqueness {
    /// Short-circuits a uniqueness check when the value equals the previous one.
    #[must_use]
    pub fn compare<T: PartialEq>(candidate: &T, previous: Option<&T>) -> Self {
        if previous.is_some_and(|previous| previous == candidate) {
            Self::Unchanged
        } else {
            Self::NeedsRemoteCheck
        }
    }
}
