//! HTTP-layer middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Redirect requests addressed to any host other than the configured main
/// domain. Requests without a Host header pass through.
pub async fn enforce_main_domain(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(|h| h.split(':').next().unwrap_or(h).to_string());

    if let Some(host) = host {
        if !host.eq_ignore_ascii_case(&state.config.domain) {
            let path = request
                .uri()
                .path_and_query()
                .map(|p| p.as_str())
                .unwrap_or("/");
            let location = format!("{}{}", state.config.public_base_url(), path);
            tracing::debug!(host = %host, location = %location, "Redirecting to main domain");
            return (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location)],
            )
                .into_response();
        }
    }

    next.run(request).await
}
