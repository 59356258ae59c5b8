//! Repository for the `bootcamps` table.

use async_trait::async_trait;
use sqlx::PgPool;

use campdex_core::geo::{GeoLocation, EARTH_RADIUS_MILES};
use campdex_core::slug::slugify;
use campdex_core::types::DbId;

use crate::models::bootcamp::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::models::course::Course;
use crate::paged::{FieldKind, FilterField, PagedCollection};
use crate::repositories::course_repo;

pub(crate) const COLUMNS: &str = "id, name, slug, description, website, phone, email, \
     latitude, longitude, formatted_address, street, city, state, zipcode, country, \
     careers, average_rating, average_cost, photo, housing, job_assistance, \
     job_guarantee, accept_gi, created_at, updated_at";

const FILTER_FIELDS: &[FilterField] = &[
    FilterField {
        name: "name",
        kind: FieldKind::Text,
    },
    FilterField {
        name: "city",
        kind: FieldKind::Text,
    },
    FilterField {
        name: "state",
        kind: FieldKind::Text,
    },
    FilterField {
        name: "housing",
        kind: FieldKind::Bool,
    },
    FilterField {
        name: "job_assistance",
        kind: FieldKind::Bool,
    },
    FilterField {
        name: "job_guarantee",
        kind: FieldKind::Bool,
    },
    FilterField {
        name: "accept_gi",
        kind: FieldKind::Bool,
    },
    FilterField {
        name: "average_cost",
        kind: FieldKind::Int,
    },
    FilterField {
        name: "average_rating",
        kind: FieldKind::Float,
    },
    FilterField {
        name: "careers",
        kind: FieldKind::TextArray,
    },
];

/// Related records a bootcamp list can embed.
#[derive(Debug, Clone, Copy)]
pub enum BootcampPopulate {
    /// Attach each bootcamp's courses.
    Courses,
}

/// Provides CRUD and geospatial operations for bootcamps.
pub struct BootcampRepo;

impl BootcampRepo {
    /// Insert a new bootcamp, returning the created row.
    ///
    /// The slug is derived from the name; location columns come from the
    /// geocoded address when one was resolved.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBootcamp,
        location: Option<&GeoLocation>,
    ) -> Result<Bootcamp, sqlx::Error> {
        let query = format!(
            "INSERT INTO bootcamps \
                (name, slug, description, website, phone, email, \
                 latitude, longitude, formatted_address, street, city, state, \
                 zipcode, country, careers, housing, job_assistance, \
                 job_guarantee, accept_gi) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, \
                     $14, $15, $16, $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(&input.name)
            .bind(slugify(&input.name))
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(location.map(|l| l.latitude))
            .bind(location.map(|l| l.longitude))
            .bind(location.and_then(|l| l.formatted_address.clone()))
            .bind(location.and_then(|l| l.street.clone()))
            .bind(location.and_then(|l| l.city.clone()))
            .bind(location.and_then(|l| l.state.clone()))
            .bind(location.and_then(|l| l.zipcode.clone()))
            .bind(location.and_then(|l| l.country.clone()))
            .bind(&input.careers)
            .bind(input.housing)
            .bind(input.job_assistance)
            .bind(input.job_guarantee)
            .bind(input.accept_gi)
            .fetch_one(pool)
            .await
    }

    /// Find a bootcamp by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Bootcamp>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bootcamps WHERE id = $1");
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a bootcamp. Only non-`None` fields are applied; a name change
    /// regenerates the slug.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBootcamp,
    ) -> Result<Option<Bootcamp>, sqlx::Error> {
        let slug = input.name.as_deref().map(slugify);
        let query = format!(
            "UPDATE bootcamps SET \
                name = COALESCE($2, name), \
                slug = COALESCE($3, slug), \
                description = COALESCE($4, description), \
                website = COALESCE($5, website), \
                phone = COALESCE($6, phone), \
                email = COALESCE($7, email), \
                careers = COALESCE($8, careers), \
                housing = COALESCE($9, housing), \
                job_assistance = COALESCE($10, job_assistance), \
                job_guarantee = COALESCE($11, job_guarantee), \
                accept_gi = COALESCE($12, accept_gi), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.phone)
            .bind(&input.email)
            .bind(&input.careers)
            .bind(input.housing)
            .bind(input.job_assistance)
            .bind(input.job_guarantee)
            .bind(input.accept_gi)
            .fetch_optional(pool)
            .await
    }

    /// Delete a bootcamp. Courses cascade at the schema level.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bootcamps WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the stored photo filename, returning the updated row.
    pub async fn set_photo(
        pool: &PgPool,
        id: DbId,
        filename: &str,
    ) -> Result<Option<Bootcamp>, sqlx::Error> {
        let query = format!(
            "UPDATE bootcamps SET photo = $2, updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(id)
            .bind(filename)
            .fetch_optional(pool)
            .await
    }

    /// Find bootcamps within `distance_miles` of a point, by great-circle
    /// distance on a sphere of radius [`EARTH_RADIUS_MILES`].
    pub async fn find_within_radius(
        pool: &PgPool,
        latitude: f64,
        longitude: f64,
        distance_miles: f64,
    ) -> Result<Vec<Bootcamp>, sqlx::Error> {
        // LEAST guards acos against rounding slightly above 1.0 when the
        // point coincides with a stored location.
        let query = format!(
            "SELECT {COLUMNS} FROM bootcamps \
             WHERE latitude IS NOT NULL AND longitude IS NOT NULL \
               AND {EARTH_RADIUS_MILES} * acos(LEAST(1.0, \
                     cos(radians($1)) * cos(radians(latitude)) \
                       * cos(radians(longitude) - radians($2)) \
                     + sin(radians($1)) * sin(radians(latitude)))) <= $3 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Bootcamp>(&query)
            .bind(latitude)
            .bind(longitude)
            .bind(distance_miles)
            .fetch_all(pool)
            .await
    }

    /// Attach each bootcamp's courses (the list-endpoint populate step).
    pub async fn attach_courses(
        pool: &PgPool,
        bootcamps: &mut [Bootcamp],
    ) -> Result<(), sqlx::Error> {
        if bootcamps.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = bootcamps.iter().map(|b| b.id).collect();
        let query = format!(
            "SELECT {} FROM courses WHERE bootcamp_id = ANY($1) ORDER BY id",
            course_repo::COLUMNS
        );
        let courses: Vec<Course> = sqlx::query_as(&query).bind(&ids).fetch_all(pool).await?;

        for bootcamp in bootcamps.iter_mut() {
            bootcamp.courses = Some(Vec::new());
        }
        for course in courses {
            if let Some(bootcamp) = bootcamps.iter_mut().find(|b| b.id == course.bootcamp_id) {
                if let Some(list) = bootcamp.courses.as_mut() {
                    list.push(course);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PagedCollection for Bootcamp {
    type Populate = BootcampPopulate;

    const TABLE: &'static str = "bootcamps";
    const COLUMNS: &'static str = COLUMNS;

    fn filter_fields() -> &'static [FilterField] {
        FILTER_FIELDS
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "average_cost", "average_rating", "created_at"]
    }

    async fn populate(
        pool: &PgPool,
        records: &mut [Self],
        spec: &Self::Populate,
    ) -> Result<(), sqlx::Error> {
        match spec {
            BootcampPopulate::Courses => BootcampRepo::attach_courses(pool, records).await,
        }
    }
}
