//! Repository for the `courses` table.

use async_trait::async_trait;
use sqlx::PgPool;

use campdex_core::types::DbId;

use crate::models::course::{BootcampSummary, Course, CreateCourse, UpdateCourse};
use crate::paged::{FieldKind, FilterField, PagedCollection};

pub(crate) const COLUMNS: &str = "id, bootcamp_id, title, description, weeks, tuition, \
     minimum_skill, scholarship_available, created_at, updated_at";

const FILTER_FIELDS: &[FilterField] = &[
    FilterField {
        name: "title",
        kind: FieldKind::Text,
    },
    FilterField {
        name: "weeks",
        kind: FieldKind::Int,
    },
    FilterField {
        name: "tuition",
        kind: FieldKind::Int,
    },
    FilterField {
        name: "minimum_skill",
        kind: FieldKind::Text,
    },
    FilterField {
        name: "scholarship_available",
        kind: FieldKind::Bool,
    },
    FilterField {
        name: "bootcamp_id",
        kind: FieldKind::Int,
    },
];

/// Related records a course list can embed.
#[derive(Debug, Clone, Copy)]
pub enum CoursePopulate {
    /// Attach a summary of each course's owning bootcamp.
    Bootcamp,
}

/// Provides CRUD operations for courses and maintains the owning bootcamp's
/// average course cost.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course under a bootcamp, returning the created row.
    pub async fn create(
        pool: &PgPool,
        bootcamp_id: DbId,
        input: &CreateCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses \
                (bootcamp_id, title, description, weeks, tuition, \
                 minimum_skill, scholarship_available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(bootcamp_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.weeks)
            .bind(input.tuition)
            .bind(&input.minimum_skill)
            .bind(input.scholarship_available)
            .fetch_one(pool)
            .await
    }

    /// Find a course by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every course belonging to one bootcamp.
    pub async fn list_for_bootcamp(
        pool: &PgPool,
        bootcamp_id: DbId,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM courses WHERE bootcamp_id = $1 ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(bootcamp_id)
            .fetch_all(pool)
            .await
    }

    /// Update a course. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                weeks = COALESCE($4, weeks), \
                tuition = COALESCE($5, tuition), \
                minimum_skill = COALESCE($6, minimum_skill), \
                scholarship_available = COALESCE($7, scholarship_available), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.weeks)
            .bind(input.tuition)
            .bind(&input.minimum_skill)
            .bind(input.scholarship_available)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course, returning the owning bootcamp's ID so the caller can
    /// recompute its average cost.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("DELETE FROM courses WHERE id = $1 RETURNING bootcamp_id")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Recalculate the owning bootcamp's average course cost.
    ///
    /// NULL when the bootcamp has no courses left.
    pub async fn recompute_average_cost(
        pool: &PgPool,
        bootcamp_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE bootcamps \
             SET average_cost = \
                 (SELECT CEIL(AVG(tuition))::int FROM courses WHERE bootcamp_id = $1) \
             WHERE id = $1",
        )
        .bind(bootcamp_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Attach the owning bootcamp summary (the list-endpoint populate step).
    pub async fn attach_bootcamp(
        pool: &PgPool,
        courses: &mut [Course],
    ) -> Result<(), sqlx::Error> {
        if courses.is_empty() {
            return Ok(());
        }

        let ids: Vec<DbId> = courses.iter().map(|c| c.bootcamp_id).collect();
        let summaries: Vec<BootcampSummary> =
            sqlx::query_as("SELECT id, name, description FROM bootcamps WHERE id = ANY($1)")
                .bind(&ids)
                .fetch_all(pool)
                .await?;

        for course in courses.iter_mut() {
            course.bootcamp = summaries
                .iter()
                .find(|b| b.id == course.bootcamp_id)
                .cloned();
        }
        Ok(())
    }
}

#[async_trait]
impl PagedCollection for Course {
    type Populate = CoursePopulate;

    const TABLE: &'static str = "courses";
    const COLUMNS: &'static str = COLUMNS;

    fn filter_fields() -> &'static [FilterField] {
        FILTER_FIELDS
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["title", "weeks", "tuition", "minimum_skill", "created_at"]
    }

    async fn populate(
        pool: &PgPool,
        records: &mut [Self],
        spec: &Self::Populate,
    ) -> Result<(), sqlx::Error> {
        match spec {
            CoursePopulate::Bootcamp => CourseRepo::attach_bootcamp(pool, records).await,
        }
    }
}
