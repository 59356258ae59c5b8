//! Route definitions for the course resource.
//!
//! ```text
//! GET    /        list_courses
//! GET    /{id}    get_course
//! PUT    /{id}    update_course
//! DELETE /{id}    delete_course
//! ```
//!
//! Course creation and the per-bootcamp list live under
//! `/bootcamps/{id}/courses` (see the bootcamp routes).

use axum::routing::get;
use axum::Router;

use crate::handlers::courses;
use crate::state::AppState;

/// Course routes — mounted at `/courses`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list_courses))
        .route(
            "/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
}
