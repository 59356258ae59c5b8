//! Handlers for the bootcamp resource.
//!
//! List endpoints run through the paged-query engine (filtering, field
//! selection, sorting, pagination); single-record endpoints are direct
//! repository calls.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use campdex_core::error::CoreError;
use campdex_core::types::DbId;
use campdex_db::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use campdex_db::paged;
use campdex_db::repositories::{BootcampPopulate, BootcampRepo};

use crate::error::{AppError, AppResult};
use crate::query::RawQueryPairs;
use crate::response::{list_response, CollectionResponse, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a bootcamp exists, returning the full row.
pub(crate) async fn ensure_bootcamp_exists(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<Bootcamp> {
    BootcampRepo::find_by_id(pool, id).await?.ok_or(AppError::Core(
        CoreError::NotFound {
            entity: "Bootcamp",
            id,
        },
    ))
}

// ---------------------------------------------------------------------------
// GET /bootcamps
// ---------------------------------------------------------------------------

/// List bootcamps with filtering, selection, sorting, and pagination.
/// Each record embeds its courses.
pub async fn list_bootcamps(
    State(state): State<AppState>,
    Query(raw): Query<RawQueryPairs>,
) -> AppResult<impl IntoResponse> {
    let paged =
        paged::fetch_paged::<Bootcamp>(&state.pool, &raw, Some(&BootcampPopulate::Courses))
            .await?;
    tracing::debug!(count = paged.records.len(), total = paged.total, "Listed bootcamps");
    Ok(Json(list_response(paged)?))
}

// ---------------------------------------------------------------------------
// POST /bootcamps
// ---------------------------------------------------------------------------

/// Create a new bootcamp. A supplied address is resolved through the
/// geocoder into the location columns.
pub async fn create_bootcamp(
    State(state): State<AppState>,
    Json(input): Json<CreateBootcamp>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let location = match input.address.as_deref() {
        Some(address) => Some(state.geocoder.geocode(address).await?),
        None => None,
    };

    let created = BootcampRepo::create(&state.pool, &input, location.as_ref()).await?;
    tracing::info!(id = created.id, name = %created.name, "Bootcamp created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

// ---------------------------------------------------------------------------
// GET /bootcamps/{id}
// ---------------------------------------------------------------------------

/// Get a single bootcamp by ID.
pub async fn get_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let bootcamp = ensure_bootcamp_exists(&state.pool, id).await?;
    Ok(Json(DataResponse::new(bootcamp)))
}

// ---------------------------------------------------------------------------
// PUT /bootcamps/{id}
// ---------------------------------------------------------------------------

/// Update an existing bootcamp.
pub async fn update_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBootcamp>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let updated = BootcampRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Bootcamp",
            id,
        }))?;
    tracing::info!(id, "Bootcamp updated");
    Ok(Json(DataResponse::new(updated)))
}

// ---------------------------------------------------------------------------
// DELETE /bootcamps/{id}
// ---------------------------------------------------------------------------

/// Delete a bootcamp and, via the schema, its courses.
pub async fn delete_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = BootcampRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Bootcamp",
            id,
        }));
    }
    tracing::info!(id, "Bootcamp deleted");
    Ok(Json(DataResponse::new(serde_json::json!({}))))
}

// ---------------------------------------------------------------------------
// GET /bootcamps/radius/{zipcode}/{distance}
// ---------------------------------------------------------------------------

/// List bootcamps within `distance` miles of a zipcode's location.
pub async fn bootcamps_in_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, f64)>,
) -> AppResult<impl IntoResponse> {
    if !(distance > 0.0) {
        return Err(AppError::BadRequest(
            "distance must be a positive number of miles".into(),
        ));
    }

    let location = state.geocoder.geocode(&zipcode).await?;
    let records = BootcampRepo::find_within_radius(
        &state.pool,
        location.latitude,
        location.longitude,
        distance,
    )
    .await?;
    tracing::debug!(
        zipcode = %zipcode,
        distance,
        count = records.len(),
        "Radius search"
    );
    Ok(Json(CollectionResponse::new(records)))
}

// ---------------------------------------------------------------------------
// PUT /bootcamps/{id}/photo
// ---------------------------------------------------------------------------

/// Upload a bootcamp photo. The payload must be a PNG, JPEG, or WebP image
/// within the configured size limit; it is stored under the upload
/// directory as `photo_{id}.{ext}` and the filename persisted on the row.
pub async fn upload_bootcamp_photo(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    ensure_bootcamp_exists(&state.pool, id).await?;

    let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    else {
        return Err(AppError::BadRequest("expected a file field".into()));
    };
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if bytes.len() as u64 > state.config.max_file_upload {
        return Err(AppError::BadRequest(format!(
            "file exceeds the {} byte upload limit",
            state.config.max_file_upload
        )));
    }

    let format = image::guess_format(&bytes)
        .map_err(|_| AppError::BadRequest("file is not a recognized image".into()))?;
    let ext = match format {
        image::ImageFormat::Png => "png",
        image::ImageFormat::Jpeg => "jpg",
        image::ImageFormat::WebP => "webp",
        _ => return Err(AppError::BadRequest("unsupported image format".into())),
    };

    tokio::fs::create_dir_all(&state.config.file_upload_path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;
    let filename = format!("photo_{id}.{ext}");
    let path = state.config.file_upload_path.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let updated = BootcampRepo::set_photo(&state.pool, id, &filename)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Bootcamp",
            id,
        }))?;
    tracing::info!(id, filename = %filename, size = bytes.len(), "Bootcamp photo stored");
    Ok(Json(DataResponse::new(updated)))
}
