//! Application wiring: storage, services, router.

pub mod server;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use filedrop_core::{Config, UploadPolicy};
use filedrop_services::IntakeService;
use filedrop_storage::{LocalStorage, Storage};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::enforce_main_domain;
use crate::state::AppState;

/// Initialize the tracing subscriber. Called once from the binary.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "filedrop_api=info,filedrop_services=info,filedrop_storage=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the application state and router from a loaded configuration.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    let storage: Arc<dyn Storage> = Arc::new(LocalStorage::new(&config.upload_dir).await?);

    let policy = UploadPolicy::new(config.allowed_extensions.clone(), config.size_limits);
    let intake = IntakeService::new(policy, storage.clone(), config.public_base_url());

    let state = Arc::new(AppState {
        config,
        intake,
        storage,
    });

    let router = build_router(state.clone());
    Ok((state, router))
}

/// Build the router. Separate from `initialize_app` so tests can drive it
/// directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // The per-category size ceilings are the enforced limits, so axum's
        // default body cap is lifted on the upload route.
        .route(
            "/upload",
            post(handlers::upload::upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/uploads/{name}", get(handlers::serve::serve_upload))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            enforce_main_domain,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
