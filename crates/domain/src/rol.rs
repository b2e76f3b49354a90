use iam_graph_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::facultad::Facultad;
use crate::identity::{AuditStamp, EntityId, IdRol};

/// Minimum Rol name length accepted on save.
pub const ROL_NAME_MIN_LENGTH: usize = 4;

/// Maximum Rol name length accepted on save.
pub const ROL_NAME_MAX_LENGTH: usize = 30;

/// A named bundle of Facultades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rol {
    id: Option<EntityId>,
    id_rol: IdRol,
    nombre: NonEmptyString,
    activo: bool,
    audit: Option<AuditStamp>,
    facultades: Vec<Facultad>,
}

impl Rol {
    /// Creates a Rol that has not been persisted yet.
    pub fn new(id_rol: IdRol, nombre: impl Into<String>, activo: bool) -> AppResult<Self> {
        Ok(Self {
            id: None,
            id_rol,
            nombre: NonEmptyString::new(nombre)?,
            activo,
            audit: None,
            facultades: Vec::new(),
        })
    }

    /// Returns the same Rol carrying a backing-store identity.
    #[must_use]
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the same Rol carrying an audit stamp.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditStamp) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Returns the same Rol with the given assigned Facultades.
    #[must_use]
    pub fn with_facultades(mut self, facultades: Vec<Facultad>) -> Self {
        self.facultades = facultades;
        self
    }

    /// Checks the form rules applied before a save.
    pub fn validate_for_save(&self) -> AppResult<()> {
        let length = self.nombre.as_str().chars().count();
        if !(ROL_NAME_MIN_LENGTH..=ROL_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "rol name must be {ROL_NAME_MIN_LENGTH} to {ROL_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(())
    }

    /// Returns the backing-store identity; `None` for a new Rol.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns the business identifier.
    #[must_use]
    pub fn id_rol(&self) -> IdRol {
        self.id_rol
    }

    /// Returns the display name.
    #[must_use]
    pub fn nombre(&self) -> &NonEmptyString {
        &self.nombre
    }

    /// Returns whether the Rol is active.
    #[must_use]
    pub fn activo(&self) -> bool {
        self.activo
    }

    /// Returns the last audit stamp, if any.
    #[must_use]
    pub fn audit(&self) -> Option<&AuditStamp> {
        self.audit.as_ref()
    }

    /// Returns the assigned Facultades.
    #[must_use]
    pub fn facultades(&self) -> &[Facultad] {
        self.facultades.as_slice()
    }
}
