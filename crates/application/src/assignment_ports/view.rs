use iam_graph_domain::{MemberKey, NodeSelected};

/// Why a payload is being pushed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// First render after a (re)start; the renderer lays the graph out anew.
    Start,
    /// Incremental update after a committed mutation.
    Update,
    /// Re-render of unchanged state.
    Refresh,
}

/// Phase of the interaction currently being processed by an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    /// No interaction in flight.
    Idle,
    /// A drop gesture started or an item was dropped.
    DropPending,
    /// A delete batch was requested.
    DeletePending,
    /// A delete batch is being checked against the snapshot.
    Validating,
    /// Remote calls are in flight; the drop zone and delete action should be disabled.
    Committing,
}

impl InteractionPhase {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DropPending => "drop_pending",
            Self::DeletePending => "delete_pending",
            Self::Validating => "validating",
            Self::Committing => "committing",
        }
    }
}

/// Signal sent from an editor to its presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphViewEvent {
    /// A serialized snapshot to draw.
    Rendered {
        /// Opaque payload produced by the graph model.
        payload: String,
        /// Render reason.
        mode: RenderMode,
        /// Drop-zone title for the current subject.
        drop_title: String,
    },
    /// An assignment was confirmed by the store and added to the snapshot.
    SaveConfirmed {
        /// Edge key of the assigned member.
        member: MemberKey,
    },
    /// A node became selected.
    NodeSelected(NodeSelected),
    /// The selection was emptied.
    SelectionCleared,
    /// The editor moved to another interaction phase.
    PhaseChanged(InteractionPhase),
}

/// Presentation-side consumer of editor signals.
pub trait GraphViewSink: Send + Sync {
    /// Receives one signal. Must not block.
    fn publish(&self, event: GraphViewEvent);
}
