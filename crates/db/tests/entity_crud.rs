//! Integration tests for bootcamp and course CRUD.
//!
//! Exercises the repository layer against a real database:
//! - Create/find/update/delete for both entities
//! - Slug regeneration on rename
//! - Cascade delete of courses
//! - Unique-name constraint violations
//! - Average-cost maintenance from course tuitions

use sqlx::PgPool;

use campdex_db::models::bootcamp::{CreateBootcamp, UpdateBootcamp};
use campdex_db::models::course::CreateCourse;
use campdex_db::repositories::{BootcampRepo, CourseRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_bootcamp(name: &str) -> CreateBootcamp {
    CreateBootcamp {
        name: name.to_string(),
        description: "Full stack development".to_string(),
        website: None,
        phone: None,
        email: None,
        address: None,
        careers: vec!["Web Development".to_string()],
        housing: false,
        job_assistance: true,
        job_guarantee: false,
        accept_gi: false,
    }
}

fn new_course(title: &str, tuition: i32) -> CreateCourse {
    CreateCourse {
        title: title.to_string(),
        description: "Twelve weeks of practice".to_string(),
        weeks: 12,
        tuition,
        minimum_skill: "beginner".to_string(),
        scholarship_available: false,
    }
}

// ---------------------------------------------------------------------------
// Bootcamps
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_and_find_bootcamp(pool: PgPool) {
    let created = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();

    assert_eq!(created.slug, "devworks-bootcamp");
    assert_eq!(created.photo, "no-photo.jpg");
    assert_eq!(created.careers, vec!["Web Development".to_string()]);
    assert!(created.average_cost.is_none());

    let found = BootcampRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("bootcamp should exist");
    assert_eq!(found.name, "Devworks Bootcamp");
}

#[sqlx::test(migrations = "./migrations")]
async fn rename_regenerates_slug_and_keeps_other_fields(pool: PgPool) {
    let created = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();

    let update = UpdateBootcamp {
        name: Some("ModernTech Bootcamp".to_string()),
        description: None,
        website: None,
        phone: None,
        email: None,
        careers: None,
        housing: None,
        job_assistance: None,
        job_guarantee: None,
        accept_gi: None,
    };
    let updated = BootcampRepo::update(&pool, created.id, &update)
        .await
        .unwrap()
        .expect("bootcamp should exist");

    assert_eq!(updated.name, "ModernTech Bootcamp");
    assert_eq!(updated.slug, "moderntech-bootcamp");
    assert_eq!(updated.description, created.description);
    assert!(updated.job_assistance);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();

    let err = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_courses(pool: PgPool) {
    let bootcamp = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();
    let course = CourseRepo::create(&pool, bootcamp.id, &new_course("Front End", 8000))
        .await
        .unwrap();

    assert!(BootcampRepo::delete(&pool, bootcamp.id).await.unwrap());

    assert!(CourseRepo::find_by_id(&pool, course.id)
        .await
        .unwrap()
        .is_none());
    assert!(!BootcampRepo::delete(&pool, bootcamp.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Courses and average-cost maintenance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn course_lifecycle_maintains_average_cost(pool: PgPool) {
    let bootcamp = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();

    let front = CourseRepo::create(&pool, bootcamp.id, &new_course("Front End", 8000))
        .await
        .unwrap();
    CourseRepo::recompute_average_cost(&pool, bootcamp.id)
        .await
        .unwrap();

    let back = CourseRepo::create(&pool, bootcamp.id, &new_course("Back End", 11000))
        .await
        .unwrap();
    CourseRepo::recompute_average_cost(&pool, bootcamp.id)
        .await
        .unwrap();

    let with_avg = BootcampRepo::find_by_id(&pool, bootcamp.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(with_avg.average_cost, Some(9500));

    assert_eq!(
        CourseRepo::delete(&pool, front.id).await.unwrap(),
        Some(bootcamp.id)
    );
    assert_eq!(
        CourseRepo::delete(&pool, back.id).await.unwrap(),
        Some(bootcamp.id)
    );
    CourseRepo::recompute_average_cost(&pool, bootcamp.id)
        .await
        .unwrap();

    let emptied = BootcampRepo::find_by_id(&pool, bootcamp.id)
        .await
        .unwrap()
        .unwrap();
    assert!(emptied.average_cost.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_for_bootcamp_returns_only_its_courses(pool: PgPool) {
    let first = BootcampRepo::create(&pool, &new_bootcamp("Devworks Bootcamp"), None)
        .await
        .unwrap();
    let second = BootcampRepo::create(&pool, &new_bootcamp("Codemasters"), None)
        .await
        .unwrap();

    CourseRepo::create(&pool, first.id, &new_course("Front End", 8000))
        .await
        .unwrap();
    CourseRepo::create(&pool, second.id, &new_course("Data Science", 12000))
        .await
        .unwrap();

    let courses = CourseRepo::list_for_bootcamp(&pool, first.id).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].title, "Front End");
}
