use std::sync::Arc;

use crate::config::ServerConfig;
use crate::geocode::Geocoder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campdex_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Geocoding collaborator for radius search and address resolution.
    pub geocoder: Arc<dyn Geocoder>,
}
