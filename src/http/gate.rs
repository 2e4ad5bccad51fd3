//! Access gate applied in front of every route.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::error::ApiError;
use super::AppState;

/// Path prefixes reachable without a session
const PUBLIC_PREFIXES: [&str; 6] = [
    "/login",
    "/api/auth/login",
    "/api/auth/logout",
    "/_next",
    "/static",
    "/health",
];

/// Paths that skip the session check; anything with a dot is a static asset
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.')
}

/// Let public paths through; otherwise require a valid session cookie and
/// stash its claims in the request extensions.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    if is_public(&path) {
        return next.run(req).await;
    }

    let claims = state
        .sessions
        .token_from_headers(req.headers())
        .and_then(|token| state.sessions.verify(&token));

    match claims {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None if path.starts_with("/api/") || path == "/api" => {
            ApiError::unauthorized().into_response()
        }
        None => {
            tracing::debug!("No session for {}, redirecting to login", path);
            Redirect::temporary("/login").into_response()
        }
    }
}
