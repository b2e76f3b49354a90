mod catalog;
mod editor;

use serde::Serialize;
use ts_rs::TS;

pub use catalog::{
    AvailabilityResponse, FacultadResponse, PerfilResponse, RolResponse, SaveFacultadRequest,
    SavePerfilRequest, SaveRolRequest,
};
pub use editor::{
    DeleteSelectedResponse, DropItemRequest, DropItemResponse, EditorSessionResponse,
    MemberKeyResponse, OpenEditorSessionRequest, SelectNodeRequest, SelectNodeResponse,
    UnassignFailureResponse, ViewEventResponse,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `memory` or `http`.
    pub iam_backend: &'static str,
}
