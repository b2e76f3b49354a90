use chrono::SecondsFormat;
use iam_graph_core::AppError;
use iam_graph_domain::{AuditStamp, EntityId, Facultad, FacultadTipo, IdRol, Perfil, Rol};

use super::types::{
    FacultadResponse, PerfilResponse, RolResponse, SaveFacultadRequest, SavePerfilRequest,
    SaveRolRequest,
};

fn existing_id(id: Option<i64>) -> Result<Option<EntityId>, AppError> {
    id.map(EntityId::new).transpose()
}

fn audit_fields(audit: Option<&AuditStamp>) -> (Option<String>, Option<String>) {
    match audit {
        Some(stamp) => (
            Some(stamp.last_modified_by.clone()),
            Some(
                stamp
                    .last_modified_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ),
        None => (None, None),
    }
}

impl TryFrom<SaveFacultadRequest> for Facultad {
    type Error = AppError;

    fn try_from(value: SaveFacultadRequest) -> Result<Self, Self::Error> {
        let tipo = value
            .tipo
            .as_deref()
            .map(str::parse::<FacultadTipo>)
            .transpose()?
            .unwrap_or_default();

        let facultad = Facultad::new(value.nombre, value.descripcion, tipo, value.activo)?;
        Ok(match existing_id(value.id)? {
            Some(id) => facultad.with_id(id),
            None => facultad,
        })
    }
}

impl TryFrom<SaveRolRequest> for Rol {
    type Error = AppError;

    fn try_from(value: SaveRolRequest) -> Result<Self, Self::Error> {
        let rol = Rol::new(IdRol::new(value.id_rol)?, value.nombre, value.activo)?;
        Ok(match existing_id(value.id)? {
            Some(id) => rol.with_id(id),
            None => rol,
        })
    }
}

impl TryFrom<SavePerfilRequest> for Perfil {
    type Error = AppError;

    fn try_from(value: SavePerfilRequest) -> Result<Self, Self::Error> {
        let perfil = Perfil::new(value.nombre, value.descripcion, value.activo, value.patron)?;
        Ok(match existing_id(value.id)? {
            Some(id) => perfil.with_id(id),
            None => perfil,
        })
    }
}

impl From<&Facultad> for FacultadResponse {
    fn from(value: &Facultad) -> Self {
        let (last_modified_by, last_modified_at) = audit_fields(value.audit());
        Self {
            id: value.id().map(|id| id.value()),
            nombre: value.nombre().as_str().to_owned(),
            descripcion: value.descripcion().map(ToOwned::to_owned),
            tipo: value.tipo().as_str().to_owned(),
            tipo_initials: value.tipo().initials().to_owned(),
            activo: value.activo(),
            last_modified_by,
            last_modified_at,
        }
    }
}

impl From<&Rol> for RolResponse {
    fn from(value: &Rol) -> Self {
        let (last_modified_by, last_modified_at) = audit_fields(value.audit());
        Self {
            id: value.id().map(|id| id.value()),
            id_rol: value.id_rol().value(),
            nombre: value.nombre().as_str().to_owned(),
            activo: value.activo(),
            last_modified_by,
            last_modified_at,
            facultades: value
                .facultades()
                .iter()
                .map(FacultadResponse::from)
                .collect(),
        }
    }
}

impl From<&Perfil> for PerfilResponse {
    fn from(value: &Perfil) -> Self {
        let (last_modified_by, last_modified_at) = audit_fields(value.audit());
        Self {
            id: value.id().map(|id| id.value()),
            nombre: value.nombre().as_str().to_owned(),
            descripcion: value.descripcion().map(ToOwned::to_owned),
            activo: value.activo(),
            patron: value.patron(),
            last_modified_by,
            last_modified_at,
            roles: value.roles().iter().map(RolResponse::from).collect(),
        }
    }
}
