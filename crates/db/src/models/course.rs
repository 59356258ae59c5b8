//! Course models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use campdex_core::types::{DbId, Timestamp};

/// A row from the `courses` table.
///
/// `bootcamp` is not a column; the bootcamp populate step attaches a summary
/// of the owning bootcamp and it is omitted from JSON otherwise.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub bootcamp_id: DbId,
    pub title: String,
    pub description: String,
    pub weeks: i32,
    pub tuition: i32,
    pub minimum_skill: String,
    pub scholarship_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootcamp: Option<BootcampSummary>,
}

/// Bootcamp fields embedded into course responses by the populate step.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BootcampSummary {
    pub id: DbId,
    pub name: String,
    pub description: String,
}

/// DTO for creating a new course under a bootcamp.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub weeks: i32,
    pub tuition: i32,
    pub minimum_skill: String,
    #[serde(default)]
    pub scholarship_available: bool,
}

/// DTO for updating an existing course. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<i32>,
    pub tuition: Option<i32>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}
