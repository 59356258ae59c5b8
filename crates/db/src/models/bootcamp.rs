//! Bootcamp models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use campdex_core::types::{DbId, Timestamp};

use super::course::Course;

/// A row from the `bootcamps` table.
///
/// `courses` is not a column; the courses populate step attaches it on list
/// endpoints and it is omitted from JSON otherwise.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bootcamp {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub careers: Vec<String>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<i32>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<Course>>,
}

/// DTO for creating a new bootcamp.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBootcamp {
    pub name: String,
    pub description: String,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    /// Free-form postal address, resolved through the geocoder into the
    /// location columns; the raw address itself is not stored.
    pub address: Option<String>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

/// DTO for updating an existing bootcamp. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}
