use std::sync::Arc;

use movies_cache::CachingService;
use movies_core::clock::Clock;
use movies_core::repository::MovieRepository;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Movie persistence.
    pub movies: Arc<dyn MovieRepository>,
    /// Movie detail cache (`movie_{id}` keys).
    pub cache: CachingService,
    /// Source of "now" for validation and the in-theaters listing.
    pub clock: Arc<dyn Clock>,
}
