use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use iam_graph_application::{AssignmentEditor, DeleteOutcome};
use iam_graph_domain::{EntityId, SubjectKind, SubjectRef};
use tracing::info;
use uuid::Uuid;

use crate::dto::{
    DeleteSelectedResponse, DropItemRequest, DropItemResponse, EditorSessionResponse,
    MemberKeyResponse, OpenEditorSessionRequest, SelectNodeRequest, SelectNodeResponse,
    UnassignFailureResponse,
};
use crate::editor_sessions::{EditorSession, SessionViewBuffer};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn open_session_handler(
    State(state): State<AppState>,
    Json(payload): Json<OpenEditorSessionRequest>,
) -> ApiResult<(StatusCode, Json<EditorSessionResponse>)> {
    let subject = SubjectRef {
        kind: payload.subject_kind.parse::<SubjectKind>()?,
        id: EntityId::new(payload.subject_id)?,
    };

    let view = Arc::new(SessionViewBuffer::default());
    let mut editor = AssignmentEditor::new(state.gateway.clone(), view.clone());
    editor.open(subject).await?;

    let (session_id, shared) = state
        .editor_sessions
        .insert(EditorSession { editor, view })
        .await;
    let session = shared.lock().await;

    info!(%session_id, %subject, "editor session opened");
    Ok((
        StatusCode::CREATED,
        Json(EditorSessionResponse::capture(session_id, &session)?),
    ))
}

pub async fn close_session_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.editor_sessions.remove(session_id).await?;
    info!(%session_id, "editor session closed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn session_state_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<EditorSessionResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let session = shared.lock().await;

    Ok(Json(EditorSessionResponse::capture(session_id, &session)?))
}

pub async fn reload_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<EditorSessionResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    session.editor.reload().await?;

    Ok(Json(EditorSessionResponse::capture(session_id, &session)?))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<EditorSessionResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let session = shared.lock().await;
    session.editor.refresh()?;

    Ok(Json(EditorSessionResponse::capture(session_id, &session)?))
}

pub async fn begin_drop_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<EditorSessionResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    session.editor.begin_drop()?;

    Ok(Json(EditorSessionResponse::capture(session_id, &session)?))
}

pub async fn cancel_drop_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<EditorSessionResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    session.editor.cancel_drop();

    Ok(Json(EditorSessionResponse::capture(session_id, &session)?))
}

pub async fn drop_item_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<DropItemRequest>,
) -> ApiResult<Json<DropItemResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    let committed = session.editor.item_dropped(payload.try_into()?).await?;

    Ok(Json(DropItemResponse {
        member: MemberKeyResponse::from(&committed.member),
        session: EditorSessionResponse::capture(session_id, &session)?,
    }))
}

pub async fn select_node_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SelectNodeRequest>,
) -> ApiResult<Json<SelectNodeResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    let selected = session.editor.toggle_select(payload.into())?;

    Ok(Json(SelectNodeResponse {
        selected: selected.is_some(),
        session: EditorSessionResponse::capture(session_id, &session)?,
    }))
}

pub async fn delete_selected_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<DeleteSelectedResponse>> {
    let shared = state.editor_sessions.get(session_id).await?;
    let mut session = shared.lock().await;
    let outcome = session.editor.delete_selected().await?;

    let removed = outcome
        .removed()
        .iter()
        .map(MemberKeyResponse::from)
        .collect();
    let failures = match outcome {
        DeleteOutcome::Committed { .. } => Vec::new(),
        DeleteOutcome::PartialFailure { failures, .. } => failures
            .into_iter()
            .map(UnassignFailureResponse::from)
            .collect(),
    };

    Ok(Json(DeleteSelectedResponse {
        removed,
        failures,
        session: EditorSessionResponse::capture(session_id, &session)?,
    }))
}

#[cfg(test)]
mod tests;
