//! Shared application state, built once at startup and cloned into handlers
//! behind an `Arc`.

use std::sync::Arc;

use filedrop_core::Config;
use filedrop_services::IntakeService;
use filedrop_storage::Storage;

pub struct AppState {
    pub config: Config,
    pub intake: IntakeService,
    pub storage: Arc<dyn Storage>,
}
