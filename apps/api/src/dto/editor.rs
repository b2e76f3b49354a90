mod conversions;
mod types;

pub use types::{
    DeleteSelectedResponse, DropItemRequest, DropItemResponse, EditorSessionResponse,
    MemberKeyResponse, OpenEditorSessionRequest, SelectNodeRequest, SelectNodeResponse,
    UnassignFailureResponse, ViewEventResponse,
};
