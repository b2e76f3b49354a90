use iam_graph_application::{
    DroppedItem, GraphViewEvent, NodeClick, RenderMode, UnassignFailure,
};
use iam_graph_core::{AppError, AppResult};
use iam_graph_domain::{FacultadName, IdRol, MemberKey, NodeId, SelectionState};
use uuid::Uuid;

use crate::editor_sessions::EditorSession;

use super::types::{
    DropItemRequest, EditorSessionResponse, MemberKeyResponse, SelectNodeRequest,
    UnassignFailureResponse, ViewEventResponse,
};

impl From<&MemberKey> for MemberKeyResponse {
    fn from(value: &MemberKey) -> Self {
        let key = match value {
            MemberKey::Facultad(name) => name.as_str().to_owned(),
            MemberKey::Rol(id_rol) => id_rol.value().to_string(),
        };

        Self {
            kind: value.kind().as_str().to_owned(),
            key,
        }
    }
}

impl From<UnassignFailure> for UnassignFailureResponse {
    fn from(value: UnassignFailure) -> Self {
        Self {
            member: MemberKeyResponse::from(&value.member),
            message: value.message,
        }
    }
}

impl From<GraphViewEvent> for ViewEventResponse {
    fn from(value: GraphViewEvent) -> Self {
        match value {
            GraphViewEvent::Rendered {
                payload,
                mode,
                drop_title,
            } => Self::Rendered {
                payload,
                mode: match mode {
                    RenderMode::Start => "start",
                    RenderMode::Update => "update",
                    RenderMode::Refresh => "refresh",
                }
                .to_owned(),
                drop_title,
            },
            GraphViewEvent::SaveConfirmed { member } => Self::SaveConfirmed {
                member: MemberKeyResponse::from(&member),
            },
            GraphViewEvent::NodeSelected(selected) => Self::NodeSelected {
                slot: selected.slot,
                node_id: selected.node.value(),
            },
            GraphViewEvent::SelectionCleared => Self::SelectionCleared,
            GraphViewEvent::PhaseChanged(phase) => Self::PhaseChanged {
                phase: phase.as_str().to_owned(),
            },
        }
    }
}

fn required<T>(value: Option<T>, field: &str, item_type: &str) -> AppResult<T> {
    value.ok_or_else(|| {
        AppError::Validation(format!("{field} is required for a dropped {item_type}"))
    })
}

impl TryFrom<DropItemRequest> for DroppedItem {
    type Error = AppError;

    fn try_from(value: DropItemRequest) -> Result<Self, Self::Error> {
        match value.item_type.as_str() {
            "facultad" => Ok(Self::Assignment(MemberKey::Facultad(FacultadName::new(
                required(value.nombre, "nombre", "facultad")?,
            )?))),
            "rol" => Ok(Self::Assignment(MemberKey::Rol(IdRol::new(required(
                value.id_rol,
                "id_rol",
                "rol",
            )?)?))),
            _ => Ok(Self::Unknown {
                type_name: value.item_type,
            }),
        }
    }
}

impl From<SelectNodeRequest> for NodeClick {
    fn from(value: SelectNodeRequest) -> Self {
        Self {
            slot: value.slot,
            node: NodeId::new(value.node_id),
            revision: value.revision,
        }
    }
}

impl EditorSessionResponse {
    /// Captures the session state and drains its pending view signals.
    pub fn capture(session_id: Uuid, session: &EditorSession) -> AppResult<Self> {
        let editor = &session.editor;
        let payload = editor.current_snapshot_payload()?;
        let (revision, drop_title) = editor
            .graph()
            .map(|graph| (graph.revision(), graph.drop_title()))
            .ok_or_else(|| AppError::Precondition("editor has no graph".to_owned()))?;

        Ok(Self {
            session_id: session_id.to_string(),
            phase: editor.phase().as_str().to_owned(),
            selection_state: match editor.selection().state() {
                SelectionState::NoneSelected => "none_selected",
                SelectionState::SomeSelected => "some_selected",
            }
            .to_owned(),
            selected_slots: editor.selection().iter().map(|(slot, _)| slot).collect(),
            revision,
            drop_title,
            payload,
            events: session
                .view
                .drain()
                .into_iter()
                .map(ViewEventResponse::from)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use iam_graph_application::DroppedItem;
    use iam_graph_core::AppError;
    use iam_graph_domain::MemberKey;
    use serde_json::json;

    use super::super::types::DropItemRequest;

    fn decode(body: serde_json::Value) -> Result<DroppedItem, AppError> {
        let request: DropItemRequest =
            serde_json::from_value(body).unwrap_or_else(|_| unreachable!());
        DroppedItem::try_from(request)
    }

    #[test]
    fn facultad_drop_is_keyed_by_name() {
        let item = decode(json!({ "type": "facultad", "id": 4, "nombre": "LECTURA" }))
            .unwrap_or_else(|_| unreachable!());

        assert!(matches!(
            item,
            DroppedItem::Assignment(MemberKey::Facultad(ref name)) if name.as_str() == "LECTURA"
        ));
    }

    #[test]
    fn rol_drop_requires_its_business_id() {
        let result = decode(json!({ "type": "rol", "id": 2, "nombre": "Auditor" }));
        let keyed = decode(json!({ "type": "rol", "id_rol": 2 }));

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(matches!(
            keyed,
            Ok(DroppedItem::Assignment(MemberKey::Rol(id_rol))) if id_rol.value() == 2
        ));
    }

    #[test]
    fn unknown_type_is_forwarded_for_rejection() {
        let item = decode(json!({ "type": "usuario", "id": 9, "nombre": "alice" }))
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            item,
            DroppedItem::Unknown {
                type_name: "usuario".to_owned()
            }
        );
    }
}
