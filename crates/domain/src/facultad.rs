use iam_graph_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::identity::{AuditStamp, EntityId, FacultadName};

/// Minimum Facultad name length accepted on save.
pub const FACULTAD_NAME_MIN_LENGTH: usize = 4;

/// Maximum Facultad name length accepted on save.
pub const FACULTAD_NAME_MAX_LENGTH: usize = 8;

/// Maximum Facultad description length accepted on save.
pub const FACULTAD_DESCRIPTION_MAX_LENGTH: usize = 40;

/// Facultad category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FacultadTipo {
    /// Plain permission.
    #[default]
    Simple,
    /// Permission restricted to a time window.
    Horario,
    /// Permission over a physical resource.
    Fisica,
    /// System-level permission.
    Sistema,
}

impl FacultadTipo {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "SIMPLE",
            Self::Horario => "HORARIO",
            Self::Fisica => "FISICA",
            Self::Sistema => "SISTEMA",
        }
    }

    /// Returns the two-letter initials used in candidate lists.
    #[must_use]
    pub fn initials(&self) -> &'static str {
        match self {
            Self::Simple | Self::Sistema => "FS",
            Self::Horario => "FH",
            Self::Fisica => "FF",
        }
    }
}

impl std::str::FromStr for FacultadTipo {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SIMPLE" => Ok(Self::Simple),
            "HORARIO" => Ok(Self::Horario),
            "FISICA" => Ok(Self::Fisica),
            "SISTEMA" => Ok(Self::Sistema),
            _ => Err(AppError::Validation(format!(
                "unknown facultad tipo '{value}'"
            ))),
        }
    }
}

/// An atomic permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facultad {
    id: Option<EntityId>,
    nombre: FacultadName,
    descripcion: Option<String>,
    tipo: FacultadTipo,
    activo: bool,
    audit: Option<AuditStamp>,
}

impl Facultad {
    /// Creates a Facultad that has not been persisted yet.
    pub fn new(
        nombre: impl Into<String>,
        descripcion: Option<String>,
        tipo: FacultadTipo,
        activo: bool,
    ) -> AppResult<Self> {
        let descripcion = descripcion.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            id: None,
            nombre: FacultadName::new(nombre)?,
            descripcion,
            tipo,
            activo,
            audit: None,
        })
    }

    /// Returns the same Facultad carrying a backing-store identity.
    #[must_use]
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the same Facultad carrying an audit stamp.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditStamp) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Checks the form rules applied before a save.
    pub fn validate_for_save(&self) -> AppResult<()> {
        let length = self.nombre.as_str().chars().count();
        if !(FACULTAD_NAME_MIN_LENGTH..=FACULTAD_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "facultad name must be {FACULTAD_NAME_MIN_LENGTH} to {FACULTAD_NAME_MAX_LENGTH} characters"
            )));
        }

        if self
            .descripcion
            .as_deref()
            .is_some_and(|value| value.chars().count() > FACULTAD_DESCRIPTION_MAX_LENGTH)
        {
            return Err(AppError::Validation(format!(
                "facultad description must not exceed {FACULTAD_DESCRIPTION_MAX_LENGTH} characters"
            )));
        }

        Ok(())
    }

    /// Returns the backing-store identity, if persisted.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns the unique, case-sensitive name.
    #[must_use]
    pub fn nombre(&self) -> &FacultadName {
        &self.nombre
    }

    /// Returns the optional description.
    #[must_use]
    pub fn descripcion(&self) -> Option<&str> {
        self.descripcion.as_deref()
    }

    /// Returns the category.
    #[must_use]
    pub fn tipo(&self) -> FacultadTipo {
        self.tipo
    }

    /// Returns whether the Facultad is active.
    #[must_use]
    pub fn activo(&self) -> bool {
        self.activo
    }

    /// Returns the last audit stamp, if any.
    #[must_use]
    pub fn audit(&self) -> Option<&AuditStamp> {
        self.audit.as_ref()
    }
}
