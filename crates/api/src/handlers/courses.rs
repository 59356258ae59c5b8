//! Handlers for the course resource.
//!
//! Courses hang off bootcamps: creation and the nested list go through
//! `/bootcamps/{id}/courses`, everything else through `/courses`. Writes
//! recompute the owning bootcamp's average course cost.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use campdex_core::course::validate_minimum_skill;
use campdex_core::error::CoreError;
use campdex_core::types::DbId;
use campdex_db::models::course::{Course, CreateCourse, UpdateCourse};
use campdex_db::paged;
use campdex_db::repositories::{CoursePopulate, CourseRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::bootcamps::ensure_bootcamp_exists;
use crate::query::RawQueryPairs;
use crate::response::{list_response, CollectionResponse, DataResponse};
use crate::state::AppState;

/// Verify that a course exists, returning the full row.
async fn ensure_course_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<Course> {
    CourseRepo::find_by_id(pool, id).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "Course",
            id,
        },
    ))
}

// ---------------------------------------------------------------------------
// GET /courses
// ---------------------------------------------------------------------------

/// List courses with filtering, selection, sorting, and pagination.
/// Each record embeds a summary of its bootcamp.
pub async fn list_courses(
    State(state): State<AppState>,
    Query(raw): Query<RawQueryPairs>,
) -> AppResult<impl IntoResponse> {
    let paged =
        paged::fetch_paged::<Course>(&state.pool, &raw, Some(&CoursePopulate::Bootcamp)).await?;
    tracing::debug!(count = paged.records.len(), total = paged.total, "Listed courses");
    Ok(Json(list_response(paged)?))
}

// ---------------------------------------------------------------------------
// GET /bootcamps/{id}/courses
// ---------------------------------------------------------------------------

/// List every course belonging to one bootcamp.
pub async fn list_bootcamp_courses(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_bootcamp_exists(&state.pool, bootcamp_id).await?;
    let courses = CourseRepo::list_for_bootcamp(&state.pool, bootcamp_id).await?;
    Ok(Json(CollectionResponse::new(courses)))
}

// ---------------------------------------------------------------------------
// POST /bootcamps/{id}/courses
// ---------------------------------------------------------------------------

/// Create a course under a bootcamp.
pub async fn create_course(
    State(state): State<AppState>,
    Path(bootcamp_id): Path<DbId>,
    Json(input): Json<CreateCourse>,
) -> AppResult<impl IntoResponse> {
    validate_minimum_skill(&input.minimum_skill)?;
    ensure_bootcamp_exists(&state.pool, bootcamp_id).await?;

    let created = CourseRepo::create(&state.pool, bootcamp_id, &input).await?;
    CourseRepo::recompute_average_cost(&state.pool, bootcamp_id).await?;
    tracing::info!(id = created.id, bootcamp_id, title = %created.title, "Course created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

// ---------------------------------------------------------------------------
// GET /courses/{id}
// ---------------------------------------------------------------------------

/// Get a single course, with its bootcamp summary embedded.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut course = ensure_course_exists(&state.pool, id).await?;
    CourseRepo::attach_bootcamp(&state.pool, std::slice::from_mut(&mut course)).await?;
    Ok(Json(DataResponse::new(course)))
}

// ---------------------------------------------------------------------------
// PUT /courses/{id}
// ---------------------------------------------------------------------------

/// Update an existing course and refresh the bootcamp's average cost.
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<impl IntoResponse> {
    if let Some(skill) = input.minimum_skill.as_deref() {
        validate_minimum_skill(skill)?;
    }

    let updated = CourseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    CourseRepo::recompute_average_cost(&state.pool, updated.bootcamp_id).await?;
    tracing::info!(id, "Course updated");
    Ok(Json(DataResponse::new(updated)))
}

// ---------------------------------------------------------------------------
// DELETE /courses/{id}
// ---------------------------------------------------------------------------

/// Delete a course and refresh the bootcamp's average cost.
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bootcamp_id = CourseRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))?;
    CourseRepo::recompute_average_cost(&state.pool, bootcamp_id).await?;
    tracing::info!(id, bootcamp_id, "Course deleted");
    Ok(Json(DataResponse::new(serde_json::json!({}))))
}
