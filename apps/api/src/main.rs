//! IAM assignment-graph API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod editor_sessions;
mod error;
mod handlers;
mod iam_backend;
mod middleware;
mod state;

use iam_graph_application::IdentityService;
use iam_graph_core::AppError;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::editor_sessions::EditorSessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let backend = iam_backend::build_iam_backend(&config.iam_backend).await?;

    let app_state = AppState {
        identity_service: IdentityService::new(backend.catalog),
        gateway: backend.gateway,
        editor_sessions: EditorSessionRegistry::new(config.editor_session_idle_ttl),
        iam_backend: backend.name,
    };
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, iam_backend = backend.name, "iam graph api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}
