use async_trait::async_trait;

use iam_graph_core::AppResult;
use iam_graph_domain::{EntityId, Facultad, FacultadName, IdRol, Perfil, Rol};

/// Port for entity uniqueness reads and entity persistence.
#[async_trait]
pub trait EntityCatalog: Send + Sync {
    /// Returns whether no Facultad other than `excluding` uses `name`.
    async fn is_facultad_name_unique(
        &self,
        name: &FacultadName,
        excluding: Option<EntityId>,
    ) -> AppResult<bool>;

    /// Returns whether no Rol other than `excluding` uses `id_rol`.
    async fn is_id_rol_unique(&self, id_rol: IdRol, excluding: Option<EntityId>)
    -> AppResult<bool>;

    /// Creates or updates a Facultad and returns the stored version.
    async fn persist_facultad(&self, facultad: Facultad) -> AppResult<Facultad>;

    /// Creates or updates a Rol and returns the stored version.
    async fn persist_rol(&self, rol: Rol) -> AppResult<Rol>;

    /// Creates or updates a Perfil and returns the stored version.
    async fn persist_perfil(&self, perfil: Perfil) -> AppResult<Perfil>;
}
