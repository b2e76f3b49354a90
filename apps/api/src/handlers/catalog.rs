use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use iam_graph_core::UserIdentity;
use iam_graph_domain::EntityId;
use serde::Deserialize;

use crate::dto::{
    AvailabilityResponse, FacultadResponse, PerfilResponse, RolResponse, SaveFacultadRequest,
    SavePerfilRequest, SaveRolRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FacultadNameAvailabilityQuery {
    pub nombre: String,
    pub previous: Option<String>,
    pub excluding_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IdRolAvailabilityQuery {
    pub id_rol: i64,
    pub previous: Option<i64>,
    pub excluding_id: Option<i64>,
}

pub async fn save_facultad_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveFacultadRequest>,
) -> ApiResult<(StatusCode, Json<FacultadResponse>)> {
    let facultad = state
        .identity_service
        .save_facultad(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(FacultadResponse::from(&facultad))))
}

pub async fn save_rol_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveRolRequest>,
) -> ApiResult<(StatusCode, Json<RolResponse>)> {
    let rol = state
        .identity_service
        .save_rol(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(RolResponse::from(&rol))))
}

pub async fn save_perfil_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SavePerfilRequest>,
) -> ApiResult<(StatusCode, Json<PerfilResponse>)> {
    let perfil = state
        .identity_service
        .save_perfil(&user, payload.try_into()?)
        .await?;

    Ok((StatusCode::CREATED, Json(PerfilResponse::from(&perfil))))
}

pub async fn facultad_name_availability_handler(
    State(state): State<AppState>,
    Query(query): Query<FacultadNameAvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let available = state
        .identity_service
        .is_facultad_name_unique(
            query.nombre.as_str(),
            query.previous.as_deref(),
            query.excluding_id.map(EntityId::new).transpose()?,
        )
        .await?;

    Ok(Json(AvailabilityResponse { available }))
}

pub async fn id_rol_availability_handler(
    State(state): State<AppState>,
    Query(query): Query<IdRolAvailabilityQuery>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let available = state
        .identity_service
        .is_id_rol_unique(
            query.id_rol,
            query.previous,
            query.excluding_id.map(EntityId::new).transpose()?,
        )
        .await?;

    Ok(Json(AvailabilityResponse { available }))
}
