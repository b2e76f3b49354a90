use async_trait::async_trait;

use iam_graph_core::AppResult;
use iam_graph_domain::{GraphMember, MemberKey, SubjectGraph, SubjectRef};

/// Remote assign/unassign request, keyed by edge key and subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRequest {
    /// Persisted subject owning the edge.
    pub subject: SubjectRef,
    /// Subject caption, sent along for the store's audit trail.
    pub subject_caption: String,
    /// Edge key of the member.
    pub member: MemberKey,
}

/// Port to the authoritative store of assignment edges.
///
/// Every call is a round-trip: it resolves once the store answered.
#[async_trait]
pub trait AssignmentGateway: Send + Sync {
    /// Fetches the current assignment graph of a subject.
    async fn fetch_subject_graph(&self, subject: SubjectRef) -> AppResult<SubjectGraph>;

    /// Creates one assignment edge and returns the member as the store holds it.
    async fn assign(&self, request: &AssignmentRequest) -> AppResult<GraphMember>;

    /// Removes one assignment edge.
    async fn unassign(&self, request: &AssignmentRequest) -> AppResult<()>;
}
