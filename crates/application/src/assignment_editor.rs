use std::sync::Arc;

use iam_graph_core::{AppError, AppResult};
use iam_graph_domain::{
    AssignmentGraph, MemberKey, NodeId, NodeRef, NodeSelected, SelectionSet, SubjectGraph,
    SubjectNode, SubjectRef,
};
use tracing::{error, info, warn};

use crate::assignment_ports::{
    AssignmentGateway, AssignmentRequest, GraphViewEvent, GraphViewSink, InteractionPhase,
    RenderMode,
};

mod delete;
mod drop;
mod selection;

/// Payload of a drop gesture, decoded at the presentation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DroppedItem {
    /// Edge key of a persisted entity to assign to the subject.
    Assignment(MemberKey),
    /// Anything else the renderer let through; always rejected.
    Unknown {
        /// Type tag reported by the renderer.
        type_name: String,
    },
}

/// A click on a rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeClick {
    /// Index of the node in the rendered payload.
    pub slot: usize,
    /// Node identifier carried by the rendered payload.
    pub node: NodeId,
    /// Revision of the payload the click was made on.
    pub revision: u64,
}

/// Result of a committed drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropCommitted {
    /// Edge key that was assigned.
    pub member: MemberKey,
    /// Serialized snapshot after the assignment.
    pub payload: String,
    /// Snapshot revision after the assignment.
    pub revision: u64,
}

/// One member whose remote unassignment failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnassignFailure {
    /// Edge key that is still assigned.
    pub member: MemberKey,
    /// Failure reported by the store.
    pub message: String,
}

/// Result of a delete batch that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Every selected member was unassigned.
    Committed {
        /// Unassigned edge keys, in issue order.
        removed: Vec<MemberKey>,
        /// Serialized snapshot after the batch.
        payload: String,
    },
    /// Some unassignments failed; the successful ones are kept.
    PartialFailure {
        /// Unassigned edge keys, in issue order.
        removed: Vec<MemberKey>,
        /// Members the store refused to unassign.
        failures: Vec<UnassignFailure>,
        /// Serialized snapshot after the batch.
        payload: String,
    },
}

impl DeleteOutcome {
    /// Returns the serialized snapshot after the batch.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Committed { payload, .. } | Self::PartialFailure { payload, .. } => payload,
        }
    }

    /// Returns the edge keys that were unassigned.
    #[must_use]
    pub fn removed(&self) -> &[MemberKey] {
        match self {
            Self::Committed { removed, .. } | Self::PartialFailure { removed, .. } => removed,
        }
    }
}

/// Reconciles one subject's assignment graph with the backing store.
///
/// An editor belongs to a single session and handles one interaction at a
/// time; `&mut self` on every mutating call enforces that. The local snapshot
/// only changes after the store confirmed the corresponding write.
pub struct AssignmentEditor {
    gateway: Arc<dyn AssignmentGateway>,
    view: Arc<dyn GraphViewSink>,
    graph: Option<AssignmentGraph>,
    selection: SelectionSet,
    phase: InteractionPhase,
}

impl AssignmentEditor {
    /// Creates an editor without a graph.
    #[must_use]
    pub fn new(gateway: Arc<dyn AssignmentGateway>, view: Arc<dyn GraphViewSink>) -> Self {
        Self {
            gateway,
            view,
            graph: None,
            selection: SelectionSet::new(),
            phase: InteractionPhase::Idle,
        }
    }

    /// Returns the current interaction phase.
    #[must_use]
    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Returns the current snapshot, if a graph was started.
    #[must_use]
    pub fn graph(&self) -> Option<&AssignmentGraph> {
        self.graph.as_ref()
    }

    /// Fetches a persisted subject from the store and starts its graph.
    pub async fn open(&mut self, subject: SubjectRef) -> AppResult<String> {
        let source = self
            .gateway
            .fetch_subject_graph(subject)
            .await
            .map_err(|error| remote_failure(&format!("loading {subject}"), error))?;

        self.start_graph(source)
    }

    /// (Re)initializes the snapshot; clears the selection and any pending drop.
    pub fn start_graph(&mut self, source: SubjectGraph) -> AppResult<String> {
        let graph = AssignmentGraph::start(source).inspect_err(|fault| {
            error!(error = %fault, "subject graph from the store is inconsistent");
        })?;
        let payload = graph.payload_json()?;
        let drop_title = graph.drop_title();
        self.graph = Some(graph);
        self.clear_selection();
        self.set_phase(InteractionPhase::Idle);
        self.view.publish(GraphViewEvent::Rendered {
            payload: payload.clone(),
            mode: RenderMode::Start,
            drop_title,
        });

        Ok(payload)
    }

    /// Re-fetches the current subject and restarts its graph.
    pub async fn reload(&mut self) -> AppResult<String> {
        let subject = self.require_graph()?.subject().persisted_ref()?;
        self.open(subject).await
    }

    /// Re-renders the current snapshot without changing state.
    pub fn refresh(&self) -> AppResult<String> {
        let graph = self.require_graph()?;
        let payload = graph.payload_json()?;
        self.view.publish(GraphViewEvent::Rendered {
            payload: payload.clone(),
            mode: RenderMode::Refresh,
            drop_title: graph.drop_title(),
        });

        Ok(payload)
    }

    /// Returns the serialized current snapshot.
    pub fn current_snapshot_payload(&self) -> AppResult<String> {
        self.require_graph()?.payload_json()
    }

    fn require_graph(&self) -> AppResult<&AssignmentGraph> {
        self.graph.as_ref().ok_or_else(|| {
            AppError::Precondition("no subject graph has been started in this editor".to_owned())
        })
    }

    fn require_graph_mut(&mut self) -> AppResult<&mut AssignmentGraph> {
        self.graph.as_mut().ok_or_else(|| {
            AppError::Internal("subject graph disappeared during an interaction".to_owned())
        })
    }

    fn set_phase(&mut self, phase: InteractionPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.view.publish(GraphViewEvent::PhaseChanged(phase));
        }
    }

    fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.view.publish(GraphViewEvent::SelectionCleared);
        }
    }

    fn publish_update(&self, payload: &str) {
        if let Some(graph) = self.graph.as_ref() {
            self.view.publish(GraphViewEvent::Rendered {
                payload: payload.to_owned(),
                mode: RenderMode::Update,
                drop_title: graph.drop_title(),
            });
        }
    }
}

fn remote_failure(context: &str, error: AppError) -> AppError {
    match error {
        AppError::Remote(_)
        | AppError::Unauthorized(_)
        | AppError::Forbidden(_)
        | AppError::NotFound(_) => error,
        other => AppError::Remote(format!("{context}: {other}")),
    }
}

fn log_rejection(interaction: &str, rejection: &AppError) {
    match rejection {
        AppError::Internal(_) => error!(interaction, error = %rejection, "interaction aborted"),
        _ if rejection.is_local_rejection() => {
            warn!(interaction, error = %rejection, "interaction rejected");
        }
        _ => warn!(interaction, error = %rejection, "store refused interaction"),
    }
}

#[cfg(test)]
mod tests;
