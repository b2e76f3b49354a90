use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use iam_graph_core::AppResult;
use iam_graph_domain::{
    AuditStamp, EntityId, Facultad, FacultadTipo, IdRol, Perfil, Rol, SubjectRef,
};

/// Facultad as exchanged with the IAM backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FacultadWire {
    #[serde(default)]
    pub id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub tipo: FacultadTipo,
    #[serde(default)]
    pub usuario_modificacion: Option<String>,
    #[serde(default)]
    pub fecha_modificacion: Option<NaiveDateTime>,
    #[serde(default = "default_active")]
    pub activo: bool,
}

/// Rol as exchanged with the IAM backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RolWire {
    #[serde(default)]
    pub id: Option<i64>,
    pub id_rol: i64,
    pub nombre: String,
    #[serde(default = "default_active")]
    pub activo: bool,
    #[serde(default)]
    pub usuario_modificacion: Option<String>,
    #[serde(default)]
    pub fecha_modificacion: Option<NaiveDateTime>,
    #[serde(default)]
    pub facultades: Vec<FacultadWire>,
}

/// Perfil as exchanged with the IAM backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PerfilWire {
    #[serde(default)]
    pub id: Option<i64>,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default = "default_active")]
    pub activo: bool,
    #[serde(default)]
    pub patron: bool,
    #[serde(default)]
    pub usuario_modificacion: Option<String>,
    #[serde(default)]
    pub fecha_modificacion: Option<NaiveDateTime>,
    #[serde(default)]
    pub roles: Vec<RolWire>,
}

/// Subject reference embedded in assignment bodies.
#[derive(Debug, Clone, Serialize)]
pub(super) struct SubjectWire {
    pub id: i64,
    pub nombre: String,
}

impl SubjectWire {
    pub(super) fn new(subject: SubjectRef, caption: &str) -> Self {
        Self {
            id: subject.id.value(),
            nombre: caption.to_owned(),
        }
    }
}

/// Body of the Rol to Facultad assign and unassign calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignFacultadWire {
    pub nombre: String,
    #[serde(rename = "rolDTO")]
    pub rol_dto: SubjectWire,
}

/// Body of the Perfil to Rol assign and unassign calls.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AssignRolWire {
    pub id_rol: i64,
    #[serde(rename = "perfilDTO")]
    pub perfil_dto: SubjectWire,
}

fn default_active() -> bool {
    true
}

fn entity_id(id: Option<i64>) -> AppResult<Option<EntityId>> {
    id.filter(|id| *id > 0).map(EntityId::new).transpose()
}

fn audit(
    usuario_modificacion: Option<String>,
    fecha_modificacion: Option<NaiveDateTime>,
) -> Option<AuditStamp> {
    match (usuario_modificacion, fecha_modificacion) {
        (Some(last_modified_by), Some(at)) => Some(AuditStamp {
            last_modified_by,
            last_modified_at: at.and_utc(),
        }),
        _ => None,
    }
}

impl FacultadWire {
    pub(super) fn into_domain(self) -> AppResult<Facultad> {
        let mut facultad = Facultad::new(self.nombre, self.descripcion, self.tipo, self.activo)?;
        if let Some(id) = entity_id(self.id)? {
            facultad = facultad.with_id(id);
        }
        if let Some(stamp) = audit(self.usuario_modificacion, self.fecha_modificacion) {
            facultad = facultad.with_audit(stamp);
        }
        Ok(facultad)
    }
}

impl From<&Facultad> for FacultadWire {
    fn from(facultad: &Facultad) -> Self {
        Self {
            id: facultad.id().map(|id| id.value()),
            nombre: facultad.nombre().as_str().to_owned(),
            descripcion: facultad.descripcion().map(str::to_owned),
            tipo: facultad.tipo(),
            usuario_modificacion: facultad
                .audit()
                .map(|audit| audit.last_modified_by.clone()),
            fecha_modificacion: facultad
                .audit()
                .map(|audit| audit.last_modified_at.naive_utc()),
            activo: facultad.activo(),
        }
    }
}

impl RolWire {
    pub(super) fn into_domain(self) -> AppResult<Rol> {
        let facultades = self
            .facultades
            .into_iter()
            .map(FacultadWire::into_domain)
            .collect::<AppResult<Vec<_>>>()?;

        let mut rol = Rol::new(IdRol::new(self.id_rol)?, self.nombre, self.activo)?
            .with_facultades(facultades);
        if let Some(id) = entity_id(self.id)? {
            rol = rol.with_id(id);
        }
        if let Some(stamp) = audit(self.usuario_modificacion, self.fecha_modificacion) {
            rol = rol.with_audit(stamp);
        }
        Ok(rol)
    }
}

impl From<&Rol> for RolWire {
    fn from(rol: &Rol) -> Self {
        Self {
            id: rol.id().map(|id| id.value()),
            id_rol: rol.id_rol().value(),
            nombre: rol.nombre().as_str().to_owned(),
            activo: rol.activo(),
            usuario_modificacion: rol.audit().map(|audit| audit.last_modified_by.clone()),
            fecha_modificacion: rol.audit().map(|audit| audit.last_modified_at.naive_utc()),
            facultades: rol.facultades().iter().map(FacultadWire::from).collect(),
        }
    }
}

impl PerfilWire {
    pub(super) fn into_domain(self) -> AppResult<Perfil> {
        let roles = self
            .roles
            .into_iter()
            .map(RolWire::into_domain)
            .collect::<AppResult<Vec<_>>>()?;

        let mut perfil = Perfil::new(self.nombre, self.descripcion, self.activo, self.patron)?
            .with_roles(roles);
        if let Some(id) = entity_id(self.id)? {
            perfil = perfil.with_id(id);
        }
        if let Some(stamp) = audit(self.usuario_modificacion, self.fecha_modificacion) {
            perfil = perfil.with_audit(stamp);
        }
        Ok(perfil)
    }
}

impl From<&Perfil> for PerfilWire {
    fn from(perfil: &Perfil) -> Self {
        Self {
            id: perfil.id().map(|id| id.value()),
            nombre: perfil.nombre().as_str().to_owned(),
            descripcion: perfil.descripcion().map(str::to_owned),
            activo: perfil.activo(),
            patron: perfil.patron(),
            usuario_modificacion: perfil
                .audit()
                .map(|audit| audit.last_modified_by.clone()),
            fecha_modificacion: perfil
                .audit()
                .map(|audit| audit.last_modified_at.naive_utc()),
            roles: perfil.roles().iter().map(RolWire::from).collect(),
        }
    }
}
