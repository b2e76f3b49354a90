use std::sync::Arc;

use iam_graph_core::{AppError, AppResult, UserIdentity};
use iam_graph_domain::{
    AuditStamp, EntityId, Facultad, FacultadName, IdRol, LocalUniqueness, Perfil, Rol,
};
use tracing::{debug, info};

use crate::assignment_ports::EntityCatalog;

/// Uniqueness checks and persistence for Facultad, Rol and Perfil entities.
#[derive(Clone)]
pub struct IdentityService {
    catalog: Arc<dyn EntityCatalog>,
}

impl IdentityService {
    /// Creates an identity service.
    #[must_use]
    pub fn new(catalog: Arc<dyn EntityCatalog>) -> Self {
        Self { catalog }
    }

    /// Checks whether a Facultad name is free.
    ///
    /// An empty name is never unique. A name equal to the previously loaded
    /// one is always valid and skips the store. Advisory only: saves run
    /// their own store check.
    pub async fn is_facultad_name_unique(
        &self,
        candidate: &str,
        previous: Option<&str>,
        current_id: Option<EntityId>,
    ) -> AppResult<bool> {
        let Ok(candidate) = FacultadName::new(candidate) else {
            return Ok(false);
        };

        if LocalUniqueness::compare(&candidate.as_str(), previous.as_ref())
            == LocalUniqueness::Unchanged
        {
            return Ok(true);
        }

        debug!(nombre = %candidate, "checking facultad name against the store");
        self.catalog
            .is_facultad_name_unique(&candidate, current_id)
            .await
    }

    /// Checks whether a Rol business identifier is free.
    ///
    /// Zero and negative identifiers are never unique.
    pub async fn is_id_rol_unique(
        &self,
        candidate: i64,
        previous: Option<i64>,
        current_id: Option<EntityId>,
    ) -> AppResult<bool> {
        let Ok(id_rol) = IdRol::new(candidate) else {
            return Ok(false);
        };

        if LocalUniqueness::compare(&candidate, previous.as_ref()) == LocalUniqueness::Unchanged {
            return Ok(true);
        }

        debug!(id_rol = %id_rol, "checking idRol against the store");
        self.catalog.is_id_rol_unique(id_rol, current_id).await
    }

    /// Validates, stamps and persists a Facultad.
    ///
    /// The name is always checked against the store, excluding only the
    /// stored entity with the same identity.
    pub async fn save_facultad(
        &self,
        actor: &UserIdentity,
        facultad: Facultad,
    ) -> AppResult<Facultad> {
        facultad.validate_for_save()?;

        if !self
            .catalog
            .is_facultad_name_unique(facultad.nombre(), facultad.id())
            .await?
        {
            return Err(AppError::Validation(format!(
                "facultad name '{}' is already in use",
                facultad.nombre()
            )));
        }

        let saved = self
            .catalog
            .persist_facultad(facultad.with_audit(AuditStamp::now(actor.subject())))
            .await?;

        info!(
            actor = actor.subject(),
            nombre = %saved.nombre(),
            "facultad saved"
        );
        Ok(saved)
    }

    /// Validates, stamps and persists a Rol.
    ///
    /// The idRol is always checked against the store, excluding only the
    /// stored entity with the same identity.
    pub async fn save_rol(&self, actor: &UserIdentity, rol: Rol) -> AppResult<Rol> {
        rol.validate_for_save()?;

        if !self.catalog.is_id_rol_unique(rol.id_rol(), rol.id()).await? {
            return Err(AppError::Validation(format!(
                "idRol {} is already in use",
                rol.id_rol()
            )));
        }

        let saved = self
            .catalog
            .persist_rol(rol.with_audit(AuditStamp::now(actor.subject())))
            .await?;

        info!(
            actor = actor.subject(),
            id_rol = %saved.id_rol(),
            nombre = %saved.nombre(),
            "rol saved"
        );
        Ok(saved)
    }

    /// Validates, stamps and persists a Perfil.
    pub async fn save_perfil(&self, actor: &UserIdentity, perfil: Perfil) -> AppResult<Perfil> {
        perfil.validate_for_save()?;

        let saved = self
            .catalog
            .persist_perfil(perfil.with_audit(AuditStamp::now(actor.subject())))
            .await?;

        info!(
            actor = actor.subject(),
            nombre = %saved.nombre(),
            "perfil saved"
        );
        Ok(saved)
    }
}
