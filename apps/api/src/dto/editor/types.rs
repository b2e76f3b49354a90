use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for opening an editor on a persisted subject.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/open-editor-session-request.ts"
)]
pub struct OpenEditorSessionRequest {
    /// `rol` or `perfil`.
    pub subject_kind: String,
    pub subject_id: i64,
}

/// Item dropped on the graph.
///
/// `type` selects the member kind; any other value is forwarded to the editor
/// and rejected there.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/drop-item-request.ts"
)]
pub struct DropItemRequest {
    #[serde(rename = "type")]
    pub item_type: String,
    pub nombre: Option<String>,
    pub id_rol: Option<i64>,
}

/// Click on a rendered node.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-node-request.ts"
)]
pub struct SelectNodeRequest {
    pub slot: usize,
    pub node_id: u32,
    pub revision: u64,
}

/// Edge key of an assigned member.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/member-key-response.ts"
)]
pub struct MemberKeyResponse {
    /// `facultad` or `rol`.
    pub kind: String,
    /// Facultad name or `idRol`, as text.
    pub key: String,
}

/// Signal emitted by the editor since the previous response.
#[derive(Debug, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/view-event-response.ts"
)]
pub enum ViewEventResponse {
    Rendered {
        payload: String,
        mode: String,
        drop_title: String,
    },
    SaveConfirmed {
        member: MemberKeyResponse,
    },
    NodeSelected {
        slot: usize,
        node_id: u32,
    },
    SelectionCleared,
    PhaseChanged {
        phase: String,
    },
}

/// Current editor state plus the signals drained for this response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/editor-session-response.ts"
)]
pub struct EditorSessionResponse {
    pub session_id: String,
    pub phase: String,
    pub selection_state: String,
    pub selected_slots: Vec<usize>,
    pub revision: u64,
    pub drop_title: String,
    /// Opaque snapshot payload for the renderer.
    pub payload: String,
    pub events: Vec<ViewEventResponse>,
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/drop-item-response.ts"
)]
pub struct DropItemResponse {
    pub member: MemberKeyResponse,
    pub session: EditorSessionResponse,
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-node-response.ts"
)]
pub struct SelectNodeResponse {
    pub selected: bool,
    pub session: EditorSessionResponse,
}

/// Member the store refused to unassign.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/unassign-failure-response.ts"
)]
pub struct UnassignFailureResponse {
    pub member: MemberKeyResponse,
    pub message: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-selected-response.ts"
)]
pub struct DeleteSelectedResponse {
    pub removed: Vec<MemberKeyResponse>,
    pub failures: Vec<UnassignFailureResponse>,
    pub session: EditorSessionResponse,
}
