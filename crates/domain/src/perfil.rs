use iam_graph_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::identity::{AuditStamp, EntityId};
use crate::rol::Rol;

/// Minimum Perfil name length accepted on save.
pub const PERFIL_NAME_MIN_LENGTH: usize = 4;

/// Maximum Perfil name length accepted on save.
pub const PERFIL_NAME_MAX_LENGTH: usize = 25;

/// A profile: a bundle of Roles assignable to users and positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perfil {
    id: Option<EntityId>,
    nombre: NonEmptyString,
    descripcion: Option<String>,
    activo: bool,
    patron: bool,
    audit: Option<AuditStamp>,
    roles: Vec<Rol>,
}

impl Perfil {
    /// Creates a Perfil that has not been persisted yet.
    pub fn new(
        nombre: impl Into<String>,
        descripcion: Option<String>,
        activo: bool,
        patron: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id: None,
            nombre: NonEmptyString::new(nombre)?,
            descripcion: descripcion.filter(|value| !value.trim().is_empty()),
            activo,
            patron,
            audit: None,
            roles: Vec::new(),
        })
    }

    /// Returns the same Perfil carrying a backing-store identity.
    #[must_use]
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the same Perfil carrying an audit stamp.
    #[must_use]
    pub fn with_audit(mut self, audit: AuditStamp) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Returns the same Perfil with the given assigned Roles.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Rol>) -> Self {
        self.roles = roles;
        self
    }

    /// Checks the form rules applied before a save.
    pub fn validate_for_save(&self) -> AppResult<()> {
        let length = self.nombre.as_str().chars().count();
        if !(PERFIL_NAME_MIN_LENGTH..=PERFIL_NAME_MAX_LENGTH).contains(&length) {
            return Err(AppError::Validation(format!(
                "perfil name must be {PERFIL_NAME_MIN_LENGTH} to {PERFIL_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(())
    }

    /// Returns the backing-store identity; `None` for a new Perfil.
    #[must_use]
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn nombre(&self) -> &NonEmptyString {
        &self.nombre
    }

    /// Returns the optional description.
    #[must_use]
    pub fn descripcion(&self) -> Option<&str> {
        self.descripcion.as_deref()
    }

    /// Returns whether the Perfil is active.
    #[must_use]
    pub fn activo(&self) -> bool {
        self.activo
    }

    /// Returns whether the Perfil is a template profile.
    #[must_use]
    pub fn patron(&self) -> bool {
        self.patron
    }

    /// Returns the last audit stamp, if any.
    #[must_use]
    pub fn audit(&self) -> Option<&AuditStamp> {
        self.audit.as_ref()
    }

    /// Returns the assigned Roles.
    #[must_use]
    pub fn roles(&self) -> &[Rol] {
        self.roles.as_slice()
    }
}
