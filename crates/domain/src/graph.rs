//! In-memory assignment graph of one subject and its transport payload.
//!
//! A subject (a Rol or a Perfil) is the root node; every assigned member
//! (a Facultad for a Rol, a Rol for a Perfil) is connected to it by exactly
//! one edge. The snapshot is a read-through copy of the backing store and is
//! only mutated after the store confirmed the corresponding write.
//!
//! Node ids in the payload are positional and regenerated on every
//! serialization: the root is always `1`, members follow in insertion order.
//! The presentation layer's slot index is the node's position in `nodes`,
//! so a slot is only meaningful for the revision it was rendered from.

use iam_graph_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::facultad::Facultad;
use crate::identity::{EntityId, FacultadName, IdRol};
use crate::perfil::Perfil;
use crate::rol::Rol;

/// Kind of root entity whose assignments are being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    /// A Rol, whose members are Facultades.
    Rol,
    /// A Perfil, whose members are Roles.
    Perfil,
}

impl SubjectKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rol => "rol",
            Self::Perfil => "perfil",
        }
    }

    /// Returns the only member kind this subject accepts.
    #[must_use]
    pub fn member_kind(&self) -> MemberKind {
        match self {
            Self::Rol => MemberKind::Facultad,
            Self::Perfil => MemberKind::Rol,
        }
    }

    /// Returns the caption drawn on edges leaving this subject.
    #[must_use]
    pub fn edge_caption(&self) -> &'static str {
        match self {
            Self::Rol => "permiso",
            Self::Perfil => "rol",
        }
    }

    fn node_kind(self) -> NodeKind {
        match self {
            Self::Rol => NodeKind::Rol,
            Self::Perfil => NodeKind::Perfil,
        }
    }
}

impl std::str::FromStr for SubjectKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "rol" => Ok(Self::Rol),
            "perfil" => Ok(Self::Perfil),
            _ => Err(AppError::Validation(format!(
                "unknown subject kind '{value}'"
            ))),
        }
    }
}

/// Kind of entity that can be assigned to a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A Facultad, keyed by name.
    Facultad,
    /// A Rol, keyed by `idRol`.
    Rol,
}

impl MemberKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facultad => "facultad",
            Self::Rol => "rol",
        }
    }

    fn node_kind(self) -> NodeKind {
        match self {
            Self::Facultad => NodeKind::Facultad,
            Self::Rol => NodeKind::Rol,
        }
    }
}

/// Reference to a persisted subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectRef {
    /// Subject kind.
    pub kind: SubjectKind,
    /// Backing-store identity.
    pub id: EntityId,
}

impl std::fmt::Display for SubjectRef {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.kind.as_str(), self.id)
    }
}

/// Root node of an assignment graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectNode {
    /// Subject kind.
    pub kind: SubjectKind,
    /// Backing-store identity; `None` until the subject is saved.
    pub id: Option<EntityId>,
    /// Display caption.
    pub caption: String,
    /// Whether the subject is active.
    pub active: bool,
}

impl SubjectNode {
    /// Returns the persisted reference, or a precondition error for a new subject.
    pub fn persisted_ref(&self) -> AppResult<SubjectRef> {
        self.id
            .map(|id| SubjectRef {
                kind: self.kind,
                id,
            })
            .ok_or_else(|| {
                AppError::Precondition(format!(
                    "{} '{}' is new; save it before assigning to it",
                    self.kind.as_str(),
                    self.caption
                ))
            })
    }
}

/// Key of an assignment edge. At most one edge per key exists for a subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum MemberKey {
    /// Facultad edges are keyed by the Facultad name.
    Facultad(FacultadName),
    /// Rol edges are keyed by the Rol business identifier.
    Rol(IdRol),
}

impl MemberKey {
    /// Returns the member kind addressed by this key.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Facultad(_) => MemberKind::Facultad,
            Self::Rol(_) => MemberKind::Rol,
        }
    }
}

impl std::fmt::Display for MemberKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facultad(name) => write!(formatter, "facultad '{name}'"),
            Self::Rol(id_rol) => write!(formatter, "rol #{id_rol}"),
        }
    }
}

/// A persisted entity connected to the subject by one assignment edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMember {
    /// Edge key.
    pub key: MemberKey,
    /// Backing-store identity of the member entity.
    pub backing_id: EntityId,
    /// Display caption.
    pub caption: String,
    /// Whether the member entity is active.
    pub active: bool,
}

impl TryFrom<&Facultad> for GraphMember {
    type Error = AppError;

    fn try_from(facultad: &Facultad) -> Result<Self, Self::Error> {
        let backing_id = facultad.id().ok_or_else(|| {
            AppError::Validation(format!(
                "facultad '{}' has not been persisted",
                facultad.nombre()
            ))
        })?;

        Ok(Self {
            key: MemberKey::Facultad(facultad.nombre().clone()),
            backing_id,
            caption: facultad.nombre().as_str().to_owned(),
            active: facultad.activo(),
        })
    }
}

impl TryFrom<&Rol> for GraphMember {
    type Error = AppError;

    fn try_from(rol: &Rol) -> Result<Self, Self::Error> {
        let backing_id = rol.id().ok_or_else(|| {
            AppError::Validation(format!("rol '{}' has not been persisted", rol.nombre()))
        })?;

        Ok(Self {
            key: MemberKey::Rol(rol.id_rol()),
            backing_id,
            caption: rol.nombre().as_str().to_owned(),
            active: rol.activo(),
        })
    }
}

/// Authoritative subject graph as fetched from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGraph {
    /// Root subject.
    pub subject: SubjectNode,
    /// Assigned members in store order.
    pub members: Vec<GraphMember>,
}

impl SubjectGraph {
    /// Builds the graph source of a Rol and its Facultades.
    pub fn from_rol(rol: &Rol) -> AppResult<Self> {
        Ok(Self {
            subject: SubjectNode {
                kind: SubjectKind::Rol,
                id: rol.id(),
                caption: rol.nombre().as_str().to_owned(),
                active: rol.activo(),
            },
            members: rol
                .facultades()
                .iter()
                .map(GraphMember::try_from)
                .collect::<AppResult<Vec<_>>>()?,
        })
    }

    /// Builds the graph source of a Perfil and its Roles.
    pub fn from_perfil(perfil: &Perfil) -> AppResult<Self> {
        Ok(Self {
            subject: SubjectNode {
                kind: SubjectKind::Perfil,
                id: perfil.id(),
                caption: perfil.nombre().as_str().to_owned(),
                active: perfil.activo(),
            },
            members: perfil
                .roles()
                .iter()
                .map(GraphMember::try_from)
                .collect::<AppResult<Vec<_>>>()?,
        })
    }
}

/// Positional node identifier used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Identifier of the root subject node.
    pub const ROOT: Self = Self(1);

    /// Wraps a raw node identifier.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    fn for_member_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|index| index.checked_add(2))
            .map(Self)
    }

    fn member_index(self) -> Option<usize> {
        self.0
            .checked_sub(2)
            .and_then(|index| usize::try_from(index).ok())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Node kind drawn by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Rol node.
    Rol,
    /// Perfil node.
    Perfil,
    /// Facultad node.
    Facultad,
}

/// Serialized node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Positional identifier.
    pub id: NodeId,
    /// Backing-store identity, absent for an unsaved root.
    pub backing_id: Option<EntityId>,
    /// Display caption.
    pub caption: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Whether the entity is active.
    pub active: bool,
}

/// Serialized edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node, always the root.
    pub source: NodeId,
    /// Target member node.
    pub target: NodeId,
    /// Edge caption.
    pub caption: String,
}

/// Transport representation of an assignment graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPayload {
    /// Snapshot revision this payload was rendered from.
    pub revision: u64,
    /// Root node first, then members.
    pub nodes: Vec<GraphNode>,
    /// One edge per member.
    pub edges: Vec<GraphLink>,
}

impl GraphPayload {
    /// Encodes the payload as the opaque string handed to the renderer.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|error| AppError::Internal(format!("failed to encode graph payload: {error}")))
    }
}

/// Borrowed view of one node of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// The root subject.
    Subject(&'a SubjectNode),
    /// An assigned member.
    Member(&'a GraphMember),
}

/// Session-scoped snapshot of one subject's assignment graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentGraph {
    subject: SubjectNode,
    members: Vec<GraphMember>,
    revision: u64,
}

impl AssignmentGraph {
    /// Builds a snapshot from the authoritative graph source.
    ///
    /// A source with duplicate or foreign-kind members is an internal fault:
    /// the store must never hand those out.
    pub fn start(source: SubjectGraph) -> AppResult<Self> {
        let mut graph = Self {
            subject: source.subject,
            members: Vec::with_capacity(source.members.len()),
            revision: 0,
        };

        for member in source.members {
            graph.check_insertable(&member)?;
            graph.members.push(member);
        }

        Ok(graph)
    }

    /// Returns the root subject.
    #[must_use]
    pub fn subject(&self) -> &SubjectNode {
        &self.subject
    }

    /// Returns the assigned members in insertion order.
    #[must_use]
    pub fn members(&self) -> &[GraphMember] {
        self.members.as_slice()
    }

    /// Returns the current revision; it changes on every mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the drop-zone title shown above the graph.
    #[must_use]
    pub fn drop_title(&self) -> String {
        format!("Drag to assign to: {}", self.subject.caption)
    }

    /// Returns whether an edge with the given key already exists.
    #[must_use]
    pub fn contains(&self, key: &MemberKey) -> bool {
        self.members.iter().any(|member| &member.key == key)
    }

    /// Appends a member whose assignment the store already confirmed.
    ///
    /// Returns the serialized snapshot for display.
    pub fn add_member(&mut self, member: GraphMember) -> AppResult<String> {
        self.check_insertable(&member)?;
        self.members.push(member);
        self.bump_revision();
        self.payload().to_json()
    }

    /// Removes members whose unassignment the store already confirmed.
    ///
    /// The root node and unknown nodes are internal faults; nothing is removed
    /// unless every node resolves to a member.
    pub fn delete_nodes(&mut self, nodes: &[NodeId]) -> AppResult<String> {
        let mut keys = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.node(*node) {
                Some(NodeRef::Member(member)) => keys.push(member.key.clone()),
                Some(NodeRef::Subject(_)) => {
                    return Err(AppError::Internal(format!(
                        "root node of {} '{}' cannot be removed from the graph",
                        self.subject.kind.as_str(),
                        self.subject.caption
                    )));
                }
                None => {
                    return Err(AppError::Internal(format!(
                        "node {node} is not part of the graph at revision {}",
                        self.revision
                    )));
                }
            }
        }

        self.members.retain(|member| !keys.contains(&member.key));
        self.bump_revision();
        self.payload().to_json()
    }

    /// Looks up a node by the renderer's slot index.
    #[must_use]
    pub fn node_at(&self, slot: usize) -> Option<NodeRef<'_>> {
        match slot.checked_sub(1) {
            None => Some(NodeRef::Subject(&self.subject)),
            Some(index) => self.members.get(index).map(NodeRef::Member),
        }
    }

    /// Looks up a node by its positional identifier.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        if id == NodeId::ROOT {
            return Some(NodeRef::Subject(&self.subject));
        }

        id.member_index()
            .and_then(|index| self.members.get(index))
            .map(NodeRef::Member)
    }

    /// Returns the positional identifier of the node at a slot index.
    #[must_use]
    pub fn node_id_at(&self, slot: usize) -> Option<NodeId> {
        match slot.checked_sub(1) {
            None => Some(NodeId::ROOT),
            Some(index) if index < self.members.len() => NodeId::for_member_index(index),
            Some(_) => None,
        }
    }

    /// Renders the transport payload.
    #[must_use]
    pub fn payload(&self) -> GraphPayload {
        let caption = self.subject.kind.edge_caption();
        let mut nodes = Vec::with_capacity(self.members.len().saturating_add(1));
        let mut edges = Vec::with_capacity(self.members.len());

        nodes.push(GraphNode {
            id: NodeId::ROOT,
            backing_id: self.subject.id,
            caption: self.subject.caption.clone(),
            kind: self.subject.kind.node_kind(),
            active: self.subject.active,
        });

        for (index, member) in self.members.iter().enumerate() {
            let Some(id) = NodeId::for_member_index(index) else {
                break;
            };
            nodes.push(GraphNode {
                id,
                backing_id: Some(member.backing_id),
                caption: member.caption.clone(),
                kind: member.key.kind().node_kind(),
                active: member.active,
            });
            edges.push(GraphLink {
                source: NodeId::ROOT,
                target: id,
                caption: caption.to_owned(),
            });
        }

        GraphPayload {
            revision: self.revision,
            nodes,
            edges,
        }
    }

    /// Renders and encodes the transport payload.
    pub fn payload_json(&self) -> AppResult<String> {
        self.payload().to_json()
    }

    fn check_insertable(&self, member: &GraphMember) -> AppResult<()> {
        let expected = self.subject.kind.member_kind();
        if member.key.kind() != expected {
            return Err(AppError::Internal(format!(
                "{} cannot be attached to {} '{}'",
                member.key,
                self.subject.kind.as_str(),
                self.subject.caption
            )));
        }

        if self.contains(&member.key) {
            return Err(AppError::Internal(format!(
                "{} is already attached to {} '{}'",
                member.key,
                self.subject.kind.as_str(),
                self.subject.caption
            )));
        }

        Ok(())
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
