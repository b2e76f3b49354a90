//! Application services and ports for assignment-graph editing.

#![forbid(unsafe_code)]

mod assignment_editor;
mod assignment_ports;
mod identity_service;

pub use assignment_editor::{
    AssignmentEditor, DeleteOutcome, DropCommitted, DroppedItem, NodeClick, UnassignFailure,
};
pub use assignment_ports::{
    AssignmentGateway, AssignmentRequest, EntityCatalog, GraphViewEvent, GraphViewSink,
    InteractionPhase, RenderMode,
};
pub use identity_service::IdentityService;
