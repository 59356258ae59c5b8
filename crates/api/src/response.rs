//! Shared response envelope types for API handlers.
//!
//! List endpoints use the `{ success, count, pagination, data }` envelope;
//! single-record endpoints use `{ success, data }`. Use these instead of
//! ad-hoc `serde_json::json!` blocks to get compile-time type safety and
//! consistent serialization.

use serde::Serialize;

use campdex_core::query::{project_fields, PaginationDescriptor};
use campdex_db::paged::Paged;

use crate::error::AppError;

/// Standard single-record envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paged list envelope. `count` is the number of records on this page, not
/// the collection total.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub pagination: PaginationDescriptor,
    pub data: Vec<T>,
}

/// Unpaged list envelope (radius search, nested course lists).
#[derive(Debug, Serialize)]
pub struct CollectionResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> CollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Serialize a fetched page into the list envelope, applying the request's
/// field selection to each record.
pub fn list_response<C: Serialize>(
    paged: Paged<C>,
) -> Result<ListResponse<serde_json::Value>, AppError> {
    let mut data = Vec::with_capacity(paged.records.len());
    for record in &paged.records {
        let mut value = serde_json::to_value(record)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize record: {e}")))?;
        if let Some(fields) = &paged.select {
            project_fields(&mut value, fields);
        }
        data.push(value);
    }

    Ok(ListResponse {
        success: true,
        count: data.len(),
        pagination: paged.pagination,
        data,
    })
}
