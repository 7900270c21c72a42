pub mod config;
pub mod rest;
pub mod storage;
pub mod tasks;

use std::sync::Arc;

use config::ServerConfig;
use storage::Storage;

/// Shared application state passed to every request handler.
///
/// Constructed once at process start and handed to the router as an
/// `Arc` — no ambient globals.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    pub started_at: std::time::Instant,
}
