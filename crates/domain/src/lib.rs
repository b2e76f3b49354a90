//! Domain entities, the assignment graph model and selection state.

#![forbid(unsafe_code)]

mod facultad;
mod graph;
mod identity;
mod perfil;
mod rol;
mod selection;

pub use facultad::{
    FACULTAD_DESCRIPTION_MAX_LENGTH, FACULTAD_NAME_MAX_LENGTH, FACULTAD_NAME_MIN_LENGTH, Facultad,
    FacultadTipo,
};
pub use graph::{
    AssignmentGraph, GraphLink, GraphMember, GraphNode, GraphPayload, MemberKey, MemberKind,
    NodeId, NodeKind, NodeRef, SubjectGraph, SubjectKind, SubjectNode, SubjectRef,
};
pub use identity::{AuditStamp, EntityId, FacultadName, IdRol, LocalUniqueness};
pub use perfil::{PERFIL_NAME_MAX_LENGTH, PERFIL_NAME_MIN_LENGTH, Perfil};
pub use rol::{ROL_NAME_MAX_LENGTH, ROL_NAME_MIN_LENGTH, Rol};
pub use selection::{NodeSelected, SelectionSet, SelectionState};
