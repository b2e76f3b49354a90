use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use iam_graph_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let catalog_routes = Router::new()
        .route(
            "/api/facultades",
            post(handlers::catalog::save_facultad_handler),
        )
        .route(
            "/api/facultades/name-availability",
            get(handlers::catalog::facultad_name_availability_handler),
        )
        .route("/api/roles", post(handlers::catalog::save_rol_handler))
        .route(
            "/api/roles/id-availability",
            get(handlers::catalog::id_rol_availability_handler),
        )
        .route("/api/perfiles", post(handlers::catalog::save_perfil_handler));

    let editor_routes = Router::new()
        .route(
            "/api/editor/sessions",
            post(handlers::editor::open_session_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}",
            get(handlers::editor::session_state_handler)
                .delete(handlers::editor::close_session_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/reload",
            post(handlers::editor::reload_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/refresh",
            post(handlers::editor::refresh_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/drop/begin",
            post(handlers::editor::begin_drop_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/drop/cancel",
            post(handlers::editor::cancel_drop_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/drop",
            post(handlers::editor::drop_item_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/select",
            post(handlers::editor::select_node_handler),
        )
        .route(
            "/api/editor/sessions/{session_id}/delete",
            post(handlers::editor::delete_selected_handler),
        );

    let protected_routes = catalog_routes
        .merge(editor_routes)
        .route_layer(from_fn(middleware::require_actor));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
