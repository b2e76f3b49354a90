use std::collections::BTreeMap;

use async_trait::async_trait;
use iam_graph_application::{AssignmentGateway, AssignmentRequest, EntityCatalog};
use iam_graph_core::{AppError, AppResult};
use iam_graph_domain::{
    EntityId, Facultad, FacultadName, GraphMember, IdRol, MemberKey, Perfil, Rol, SubjectGraph,
    SubjectKind, SubjectRef,
};
use tokio::sync::RwLock;

mod assignments;
mod seed;

/// In-memory IAM store: entities plus assignment edges.
///
/// Edges are kept apart from the entities, keyed the same way the remote
/// backend keys them (Facultad name for Rol edges, idRol for Perfil edges),
/// so renames are propagated to existing edges.
#[derive(Debug, Default)]
pub struct InMemoryIamRepository {
    facultades: RwLock<BTreeMap<i64, Facultad>>,
    roles: RwLock<BTreeMap<i64, Rol>>,
    perfiles: RwLock<BTreeMap<i64, Perfil>>,
    rol_facultades: RwLock<BTreeMap<i64, Vec<FacultadName>>>,
    perfil_roles: RwLock<BTreeMap<i64, Vec<IdRol>>>,
}

impl InMemoryIamRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn rol_with_facultades(&self, rol: &Rol) -> Rol {
        let Some(id) = rol.id() else {
            return rol.clone();
        };

        let facultades = self.facultades.read().await;
        let edges = self.rol_facultades.read().await;
        let members = edges
            .get(&id.value())
            .map(|names| {
                names
                    .iter()
                    .filter_map(|name| {
                        facultades
                            .values()
                            .find(|facultad| facultad.nombre() == name)
                            .cloned()
                    })
                    .collect()
            })
            .unwrap_or_default();

        rol.clone().with_facultades(members)
    }

    async fn find_rol(&self, id: EntityId) -> AppResult<Rol> {
        let rol = self
            .roles
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("rol {id} does not exist")))?;

        Ok(self.rol_with_facultades(&rol).await)
    }

    async fn find_perfil(&self, id: EntityId) -> AppResult<Perfil> {
        let perfil = self
            .perfiles
            .read()
            .await
            .get(&id.value())
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("perfil {id} does not exist")))?;

        let assigned = self
            .perfil_roles
            .read()
            .await
            .get(&id.value())
            .cloned()
            .unwrap_or_default();

        let mut roles = Vec::with_capacity(assigned.len());
        for id_rol in assigned {
            let rol = self
                .roles
                .read()
                .await
                .values()
                .find(|rol| rol.id_rol() == id_rol)
                .cloned();
            if let Some(rol) = rol {
                roles.push(self.rol_with_facultades(&rol).await);
            }
        }

        Ok(perfil.with_roles(roles))
    }
}

fn next_id<T>(entries: &BTreeMap<i64, T>) -> AppResult<EntityId> {
    let next = entries
        .keys()
        .next_back()
        .map_or(Some(1), |last| last.checked_add(1))
        .ok_or_else(|| AppError::Internal("entity identifiers exhausted".to_owned()))?;
    EntityId::new(next)
}

#[async_trait]
impl AssignmentGateway for InMemoryIamRepository {
    async fn fetch_subject_graph(&self, subject: SubjectRef) -> AppResult<SubjectGraph> {
        match subject.kind {
            SubjectKind::Rol => SubjectGraph::from_rol(&self.find_rol(subject.id).await?),
            SubjectKind::Perfil => SubjectGraph::from_perfil(&self.find_perfil(subject.id).await?),
        }
    }

    async fn assign(&self, request: &AssignmentRequest) -> AppResult<GraphMember> {
        match (&request.subject.kind, &request.member) {
            (SubjectKind::Rol, MemberKey::Facultad(name)) => {
                self.assign_facultad(request.subject.id, name).await
            }
            (SubjectKind::Perfil, MemberKey::Rol(id_rol)) => {
                self.assign_rol(request.subject.id, *id_rol).await
            }
            _ => Err(mismatched_member(request)),
        }
    }

    async fn unassign(&self, request: &AssignmentRequest) -> AppResult<()> {
        match (&request.subject.kind, &request.member) {
            (SubjectKind::Rol, MemberKey::Facultad(name)) => {
                self.unassign_facultad(request.subject.id, name).await
            }
            (SubjectKind::Perfil, MemberKey::Rol(id_rol)) => {
                self.unassign_rol(request.subject.id, *id_rol).await
            }
            _ => Err(mismatched_member(request)),
        }
    }
}

fn mismatched_member(request: &AssignmentRequest) -> AppError {
    AppError::Validation(format!(
        "{} cannot be assigned to {}",
        request.member, request.subject
    ))
}

#[async_trait]
impl EntityCatalog for InMemoryIamRepository {
    async fn is_facultad_name_unique(
        &self,
        name: &FacultadName,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        Ok(!self
            .facultades
            .read()
            .await
            .values()
            .any(|facultad| facultad.nombre() == name && facultad.id() != excluding))
    }

    async fn is_id_rol_unique(
        &self,
        id_rol: IdRol,
        excluding: Option<EntityId>,
    ) -> AppResult<bool> {
        Ok(!self
            .roles
            .read()
            .await
            .values()
            .any(|rol| rol.id_rol() == id_rol && rol.id() != excluding))
    }

    async fn persist_facultad(&self, facultad: Facultad) -> AppResult<Facultad> {
        let mut facultades = self.facultades.write().await;
        if facultades
            .values()
            .any(|other| other.nombre() == facultad.nombre() && other.id() != facultad.id())
        {
            return Err(AppError::Conflict(format!(
                "facultad name '{}' is already in use",
                facultad.nombre()
            )));
        }
        let stored = match facultad.id() {
            Some(id) => {
                let previous = facultades.get(&id.value()).ok_or_else(|| {
                    AppError::NotFound(format!("facultad {id} does not exist"))
                })?;
                if previous.nombre() != facultad.nombre() {
                    let mut edges = self.rol_facultades.write().await;
                    for names in edges.values_mut() {
                        for name in names.iter_mut() {
                            if name == previous.nombre() {
                                *name = facultad.nombre().clone();
                            }
                        }
                    }
                }
                facultad
            }
            None => facultad.with_id(next_id(&facultades)?),
        };

        if let Some(id) = stored.id() {
            facultades.insert(id.value(), stored.clone());
        }
        Ok(stored)
    }

    async fn persist_rol(&self, rol: Rol) -> AppResult<Rol> {
        let mut roles = self.roles.write().await;
        if roles
            .values()
            .any(|other| other.id_rol() == rol.id_rol() && other.id() != rol.id())
        {
            return Err(AppError::Conflict(format!(
                "idRol {} is already in use",
                rol.id_rol()
            )));
        }
        let stored = match rol.id() {
            Some(id) => {
                let previous = roles
                    .get(&id.value())
                    .ok_or_else(|| AppError::NotFound(format!("rol {id} does not exist")))?;
                if previous.id_rol() != rol.id_rol() {
                    let mut edges = self.perfil_roles.write().await;
                    for id_rols in edges.values_mut() {
                        for id_rol in id_rols.iter_mut() {
                            if *id_rol == previous.id_rol() {
                                *id_rol = rol.id_rol();
                            }
                        }
                    }
                }
                rol.with_facultades(Vec::new())
            }
            None => rol.with_facultades(Vec::new()).with_id(next_id(&roles)?),
        };

        if let Some(id) = stored.id() {
            roles.insert(id.value(), stored.clone());
        }
        drop(roles);
        Ok(self.rol_with_facultades(&stored).await)
    }

    async fn persist_perfil(&self, perfil: Perfil) -> AppResult<Perfil> {
        let mut perfiles = self.perfiles.write().await;
        let stored = match perfil.id() {
            Some(id) => {
                if !perfiles.contains_key(&id.value()) {
                    return Err(AppError::NotFound(format!("perfil {id} does not exist")));
                }
                perfil.with_roles(Vec::new())
            }
            None => perfil.with_roles(Vec::new()).with_id(next_id(&perfiles)?),
        };

        let Some(id) = stored.id() else {
            return Err(AppError::Internal("perfil stored without identity".to_owned()));
        };
        perfiles.insert(id.value(), stored);
        drop(perfiles);
        self.find_perfil(id).await
    }
}
