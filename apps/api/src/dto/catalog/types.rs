use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for creating or updating a Facultad.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-facultad-request.ts"
)]
pub struct SaveFacultadRequest {
    pub id: Option<i64>,
    pub nombre: String,
    pub descripcion: Option<String>,
    /// One of `SIMPLE`, `HORARIO`, `FISICA`, `SISTEMA`; defaults to `SIMPLE`.
    pub tipo: Option<String>,
    #[serde(default = "default_active")]
    pub activo: bool,
}

/// Incoming payload for creating or updating a Rol.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-rol-request.ts"
)]
pub struct SaveRolRequest {
    pub id: Option<i64>,
    pub id_rol: i64,
    pub nombre: String,
    #[serde(default = "default_active")]
    pub activo: bool,
}

/// Incoming payload for creating or updating a Perfil.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-perfil-request.ts"
)]
pub struct SavePerfilRequest {
    pub id: Option<i64>,
    pub nombre: String,
    pub descripcion: Option<String>,
    #[serde(default = "default_active")]
    pub activo: bool,
    #[serde(default)]
    pub patron: bool,
}

/// API representation of a Facultad.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/facultad-response.ts"
)]
pub struct FacultadResponse {
    pub id: Option<i64>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub tipo: String,
    pub tipo_initials: String,
    pub activo: bool,
    pub last_modified_by: Option<String>,
    pub last_modified_at: Option<String>,
}

/// API representation of a Rol and its assigned Facultades.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/rol-response.ts"
)]
pub struct RolResponse {
    pub id: Option<i64>,
    pub id_rol: i64,
    pub nombre: String,
    pub activo: bool,
    pub last_modified_by: Option<String>,
    pub last_modified_at: Option<String>,
    pub facultades: Vec<FacultadResponse>,
}

/// API representation of a Perfil and its assigned Roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/perfil-response.ts"
)]
pub struct PerfilResponse {
    pub id: Option<i64>,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub activo: bool,
    pub patron: bool,
    pub last_modified_by: Option<String>,
    pub last_modified_at: Option<String>,
    pub roles: Vec<RolResponse>,
}

/// Result of a uniqueness check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/availability-response.ts"
)]
pub struct AvailabilityResponse {
    pub available: bool,
}

fn default_active() -> bool {
    true
}
