use std::sync::Arc;

use iam_graph_application::{AssignmentGateway, IdentityService};

use crate::editor_sessions::EditorSessionRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub identity_service: IdentityService,
    pub gateway: Arc<dyn AssignmentGateway>,
    pub editor_sessions: EditorSessionRegistry,
    pub iam_backend: &'static str,
}

#[cfg(test)]
impl AppState {
    /// State backed by a demo-seeded in-memory store.
    pub async fn seeded_in_memory() -> Self {
        let repository = Arc::new(iam_graph_infrastructure::InMemoryIamRepository::new());
        if repository.seed_demo_data("seed").await.is_err() {
            unreachable!();
        }

        Self {
            identity_service: IdentityService::new(repository.clone()),
            gateway: repository,
            editor_sessions: EditorSessionRegistry::default(),
            iam_backend: "memory",
        }
    }
}
