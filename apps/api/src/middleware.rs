use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use iam_graph_core::{AppError, AppResult, UserIdentity};

use crate::error::ApiResult;

/// Header carrying the console user already authenticated upstream.
pub const ACTOR_HEADER: &str = "x-iam-user";

pub async fn require_actor(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = actor_from_headers(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn actor_from_headers(headers: &HeaderMap) -> AppResult<UserIdentity> {
    let subject = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("{ACTOR_HEADER} header is required")))?;

    Ok(UserIdentity::new(subject, subject, None))
}
