//! One-shot data import/export tool.
//!
//! Usage:
//!
//! ```text
//! campdex-seeder -i    import _data/bootcamps.json and _data/courses.json
//! campdex-seeder -d    delete all bootcamps and courses
//! ```
//!
//! Seed courses reference their bootcamp by 1-based position in the
//! bootcamps file, since database IDs are only known after insertion.

use anyhow::Context;
use serde::Deserialize;

use campdex_core::geo::GeoLocation;
use campdex_db::models::bootcamp::CreateBootcamp;
use campdex_db::models::course::CreateCourse;
use campdex_db::repositories::{BootcampRepo, CourseRepo};
use campdex_db::DbPool;

/// A bootcamp seed record: the create DTO plus an optional pre-resolved
/// location (the seeder does not call the geocoder).
#[derive(Debug, Deserialize)]
struct SeedBootcamp {
    #[serde(flatten)]
    bootcamp: CreateBootcamp,
    location: Option<SeedLocation>,
}

#[derive(Debug, Deserialize)]
struct SeedLocation {
    latitude: f64,
    longitude: f64,
    formatted_address: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    zipcode: Option<String>,
    country: Option<String>,
}

impl From<SeedLocation> for GeoLocation {
    fn from(seed: SeedLocation) -> Self {
        GeoLocation {
            latitude: seed.latitude,
            longitude: seed.longitude,
            formatted_address: seed.formatted_address,
            street: seed.street,
            city: seed.city,
            state: seed.state,
            zipcode: seed.zipcode,
            country: seed.country,
        }
    }
}

/// A course seed record: the create DTO plus the owning bootcamp's 1-based
/// position in the bootcamps file.
#[derive(Debug, Deserialize)]
struct SeedCourse {
    bootcamp: usize,
    #[serde(flatten)]
    course: CreateCourse,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campdex_seeder=info".into()),
        )
        .init();

    let mode = std::env::args().nth(1).unwrap_or_default();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = campdex_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    campdex_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    match mode.as_str() {
        "-i" => import(&pool).await,
        "-d" => destroy(&pool).await,
        _ => {
            eprintln!("usage: campdex-seeder [-i | -d]");
            std::process::exit(2);
        }
    }
}

/// Import bootcamps and courses from the `_data` directory.
async fn import(pool: &DbPool) -> anyhow::Result<()> {
    let bootcamps: Vec<SeedBootcamp> = read_seed_file("_data/bootcamps.json")?;
    let courses: Vec<SeedCourse> = read_seed_file("_data/courses.json")?;

    let mut ids = Vec::with_capacity(bootcamps.len());
    for seed in bootcamps {
        let location = seed.location.map(GeoLocation::from);
        let created = BootcampRepo::create(pool, &seed.bootcamp, location.as_ref())
            .await
            .with_context(|| format!("Failed to insert bootcamp `{}`", seed.bootcamp.name))?;
        ids.push(created.id);
    }
    tracing::info!(count = ids.len(), "Bootcamps imported");

    let mut course_count = 0usize;
    for seed in courses {
        let bootcamp_id = *ids
            .get(seed.bootcamp.checked_sub(1).context("course bootcamp position must be >= 1")?)
            .with_context(|| format!("course references unknown bootcamp #{}", seed.bootcamp))?;
        CourseRepo::create(pool, bootcamp_id, &seed.course)
            .await
            .with_context(|| format!("Failed to insert course `{}`", seed.course.title))?;
        CourseRepo::recompute_average_cost(pool, bootcamp_id).await?;
        course_count += 1;
    }
    tracing::info!(count = course_count, "Courses imported");

    Ok(())
}

/// Delete all seeded data.
async fn destroy(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM courses").execute(pool).await?;
    sqlx::query("DELETE FROM bootcamps").execute(pool).await?;
    tracing::info!("Data destroyed");
    Ok(())
}

fn read_seed_file<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<Vec<T>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {path}"))
}
