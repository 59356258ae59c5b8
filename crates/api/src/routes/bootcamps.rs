//! Route definitions for the bootcamp resource.
//!
//! ```text
//! GET    /                              list_bootcamps
//! POST   /                              create_bootcamp
//! GET    /radius/{zipcode}/{distance}   bootcamps_in_radius
//! GET    /{id}                          get_bootcamp
//! PUT    /{id}                          update_bootcamp
//! DELETE /{id}                          delete_bootcamp
//! PUT    /{id}/photo                    upload_bootcamp_photo
//! GET    /{id}/courses                  list_bootcamp_courses
//! POST   /{id}/courses                  create_course
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{bootcamps, courses};
use crate::state::AppState;

/// Bootcamp routes — mounted at `/bootcamps`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bootcamps::list_bootcamps).post(bootcamps::create_bootcamp),
        )
        .route(
            "/radius/{zipcode}/{distance}",
            get(bootcamps::bootcamps_in_radius),
        )
        .route(
            "/{id}",
            get(bootcamps::get_bootcamp)
                .put(bootcamps::update_bootcamp)
                .delete(bootcamps::delete_bootcamp),
        )
        .route("/{id}/photo", put(bootcamps::upload_bootcamp_photo))
        .route(
            "/{id}/courses",
            get(courses::list_bootcamp_courses).post(courses::create_course),
        )
}
