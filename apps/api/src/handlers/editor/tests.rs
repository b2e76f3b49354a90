use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use iam_graph_core::AppError;
use uuid::Uuid;

use super::{
    begin_drop_handler, cancel_drop_handler, close_session_handler, delete_selected_handler,
    drop_item_handler, open_session_handler, refresh_handler, reload_handler,
    select_node_handler, session_state_handler,
};
use crate::dto::{
    DropItemRequest, EditorSessionResponse, OpenEditorSessionRequest, SelectNodeRequest,
    ViewEventResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

async fn open(state: &AppState, subject_kind: &str, subject_id: i64) -> (Uuid, EditorSessionResponse) {
    let result = open_session_handler(
        State(state.clone()),
        Json(OpenEditorSessionRequest {
            subject_kind: subject_kind.to_owned(),
            subject_id,
        }),
    )
    .await;

    let Ok((status, Json(session))) = result else {
        unreachable!();
    };
    assert_eq!(status, StatusCode::CREATED);
    let session_id = Uuid::parse_str(&session.session_id).unwrap_or_else(|_| unreachable!());
    (session_id, session)
}

fn dropped_facultad(nombre: &str) -> DropItemRequest {
    DropItemRequest {
        item_type: "facultad".to_owned(),
        nombre: Some(nombre.to_owned()),
        id_rol: None,
    }
}

fn click(slot: usize, node_id: u32, revision: u64) -> Json<SelectNodeRequest> {
    Json(SelectNodeRequest {
        slot,
        node_id,
        revision,
    })
}

fn phases(events: &[ViewEventResponse]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            ViewEventResponse::PhaseChanged { phase } => Some(phase.as_str()),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn opening_a_rol_renders_its_facultades() {
    let state = AppState::seeded_in_memory().await;

    let (_, session) = open(&state, "rol", 1).await;

    assert_eq!(session.phase, "idle");
    assert_eq!(session.revision, 0);
    assert_eq!(session.drop_title, "Drag to assign to: Operador");
    assert_eq!(session.selection_state, "none_selected");
    assert!(matches!(
        session.events.as_slice(),
        [ViewEventResponse::Rendered { mode, .. }] if mode == "start"
    ));
    assert!(session.payload.contains("LECTURA"));
    assert!(session.payload.contains("ESCRIBIR"));
}

#[tokio::test]
async fn opening_requires_a_known_persisted_subject() {
    let state = AppState::seeded_in_memory().await;
    let request = |subject_kind: &str, subject_id| {
        Json(OpenEditorSessionRequest {
            subject_kind: subject_kind.to_owned(),
            subject_id,
        })
    };

    let bad_kind = open_session_handler(State(state.clone()), request("usuario", 1)).await;
    let unsaved = open_session_handler(State(state.clone()), request("rol", 0)).await;
    let missing = open_session_handler(State(state), request("perfil", 40)).await;

    assert!(matches!(bad_kind, Err(ApiError(AppError::Validation(_)))));
    assert!(matches!(unsaved, Err(ApiError(AppError::Validation(_)))));
    assert!(matches!(missing, Err(ApiError(AppError::NotFound(_)))));
}

#[tokio::test]
async fn drop_select_and_delete_round_trip_through_the_store() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 1).await;

    let dropped = drop_item_handler(
        State(state.clone()),
        Path(session_id),
        Json(dropped_facultad("BORRAR")),
    )
    .await;
    let Ok(Json(dropped)) = dropped else {
        unreachable!();
    };
    assert_eq!(dropped.member.key, "BORRAR");
    assert_eq!(dropped.session.revision, 1);
    assert_eq!(
        phases(&dropped.session.events),
        vec!["drop_pending", "committing", "idle"]
    );
    assert!(
        dropped
            .session
            .events
            .iter()
            .any(|event| matches!(event, ViewEventResponse::SaveConfirmed { .. }))
    );

    let selected = select_node_handler(State(state.clone()), Path(session_id), click(3, 4, 1)).await;
    let Ok(Json(selected)) = selected else {
        unreachable!();
    };
    assert!(selected.selected);
    assert_eq!(selected.session.selected_slots, vec![3]);

    let deleted = delete_selected_handler(State(state.clone()), Path(session_id)).await;
    let Ok(Json(deleted)) = deleted else {
        unreachable!();
    };
    assert_eq!(deleted.removed.len(), 1);
    assert_eq!(deleted.removed[0].key, "BORRAR");
    assert!(deleted.failures.is_empty());
    assert_eq!(deleted.session.revision, 2);
    assert_eq!(deleted.session.selection_state, "none_selected");
    assert!(!deleted.session.payload.contains("BORRAR"));

    let reloaded = reload_handler(State(state), Path(session_id)).await;
    let Ok(Json(reloaded)) = reloaded else {
        unreachable!();
    };
    assert_eq!(reloaded.revision, 0);
    assert!(!reloaded.payload.contains("BORRAR"));
}

#[tokio::test]
async fn perfil_session_accepts_roles_only() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, session) = open(&state, "perfil", 1).await;
    assert_eq!(session.drop_title, "Drag to assign to: Cajas");

    let wrong_kind = drop_item_handler(
        State(state.clone()),
        Path(session_id),
        Json(dropped_facultad("LECTURA")),
    )
    .await;
    let auditor = drop_item_handler(
        State(state),
        Path(session_id),
        Json(DropItemRequest {
            item_type: "rol".to_owned(),
            nombre: Some("Auditor".to_owned()),
            id_rol: Some(2),
        }),
    )
    .await;

    assert!(matches!(wrong_kind, Err(ApiError(AppError::Validation(_)))));
    let Ok(Json(auditor)) = auditor else {
        unreachable!();
    };
    assert_eq!(auditor.member.kind, "rol");
    assert_eq!(auditor.member.key, "2");
}

#[tokio::test]
async fn unknown_drop_type_is_rejected_without_mutation() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 1).await;

    let result = drop_item_handler(
        State(state.clone()),
        Path(session_id),
        Json(DropItemRequest {
            item_type: "usuario".to_owned(),
            nombre: Some("alice".to_owned()),
            id_rol: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
    let Ok(Json(current)) = session_state_handler(State(state), Path(session_id)).await else {
        unreachable!();
    };
    assert_eq!(current.revision, 0);
    assert_eq!(current.phase, "idle");
    assert_eq!(phases(&current.events), vec!["drop_pending", "idle"]);
}

#[tokio::test]
async fn stale_click_and_root_delete_are_refused() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 1).await;

    let stale = select_node_handler(State(state.clone()), Path(session_id), click(1, 2, 5)).await;
    assert!(matches!(stale, Err(ApiError(AppError::StaleReference(_)))));

    let empty = delete_selected_handler(State(state.clone()), Path(session_id)).await;
    assert!(matches!(empty, Err(ApiError(AppError::Precondition(_)))));

    let root = select_node_handler(State(state.clone()), Path(session_id), click(0, 1, 0)).await;
    assert!(root.is_ok());
    let with_root = delete_selected_handler(State(state.clone()), Path(session_id)).await;
    assert!(matches!(with_root, Err(ApiError(AppError::Precondition(_)))));

    let Ok(Json(current)) = session_state_handler(State(state), Path(session_id)).await else {
        unreachable!();
    };
    assert_eq!(current.revision, 0);
    assert_eq!(current.selected_slots, vec![0]);
}

#[tokio::test]
async fn drop_gesture_can_be_cancelled_and_refreshed() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 2).await;

    let begun = begin_drop_handler(State(state.clone()), Path(session_id)).await;
    let Ok(Json(begun)) = begun else {
        unreachable!();
    };
    assert_eq!(begun.phase, "drop_pending");

    let cancelled = cancel_drop_handler(State(state.clone()), Path(session_id)).await;
    let Ok(Json(cancelled)) = cancelled else {
        unreachable!();
    };
    assert_eq!(cancelled.phase, "idle");

    let refreshed = refresh_handler(State(state), Path(session_id)).await;
    let Ok(Json(refreshed)) = refreshed else {
        unreachable!();
    };
    assert!(matches!(
        refreshed.events.as_slice(),
        [ViewEventResponse::Rendered { mode, .. }] if mode == "refresh"
    ));
}

#[tokio::test]
async fn closed_session_is_gone() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 1).await;

    let closed = close_session_handler(State(state.clone()), Path(session_id)).await;
    let after = session_state_handler(State(state), Path(session_id)).await;

    assert_eq!(closed.ok(), Some(StatusCode::NO_CONTENT));
    assert!(matches!(after, Err(ApiError(AppError::NotFound(_)))));
}

#[tokio::test]
async fn dropped_member_is_rendered_as_stored() {
    let state = AppState::seeded_in_memory().await;
    let (session_id, _) = open(&state, "rol", 2).await;
    let request: DropItemRequest = serde_json::from_value(serde_json::json!({
        "type": "facultad",
        "id": 999,
        "nombre": "BORRAR",
        "activo": false,
        "caption": "anything",
    }))
    .unwrap_or_else(|_| unreachable!());

    let dropped = drop_item_handler(State(state.clone()), Path(session_id), Json(request)).await;
    let Ok(Json(dropped)) = dropped else {
        unreachable!();
    };
    let reloaded = reload_handler(State(state), Path(session_id)).await;
    let Ok(Json(reloaded)) = reloaded else {
        unreachable!();
    };

    let nodes = |payload: &str| {
        let payload: serde_json::Value =
            serde_json::from_str(payload).unwrap_or_else(|_| unreachable!());
        payload["nodes"].clone()
    };
    let after_drop = nodes(&dropped.session.payload);
    assert_eq!(after_drop[2]["backing_id"], 3);
    assert_eq!(after_drop[2]["caption"], "BORRAR");
    assert_eq!(after_drop[2]["active"], true);
    assert_eq!(after_drop, nodes(&reloaded.payload));
}
