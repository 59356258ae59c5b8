//! Route table.

pub mod bootcamps;
pub mod courses;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bootcamps", bootcamps::router())
        .nest("/courses", courses::router())
}
