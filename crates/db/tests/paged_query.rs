//! Integration tests for the paged-query engine against a real database.
//!
//! Covers the pagination boundary behaviour, filter execution, sorting,
//! the unfiltered aggregate count, and the populate hooks.

use assert_matches::assert_matches;
use sqlx::PgPool;

use campdex_core::error::CoreError;
use campdex_core::query::{PageRef, PaginationDescriptor};
use campdex_db::models::bootcamp::{Bootcamp, CreateBootcamp};
use campdex_db::models::course::{Course, CreateCourse};
use campdex_db::paged::{fetch_paged, PagedQueryError};
use campdex_db::repositories::{
    BootcampPopulate, BootcampRepo, CoursePopulate, CourseRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn seed_bootcamps(pool: &PgPool, count: usize) -> Vec<Bootcamp> {
    let mut created = Vec::with_capacity(count);
    for i in 0..count {
        let input = CreateBootcamp {
            name: format!("Bootcamp {i:02}"),
            description: "Hands-on training".to_string(),
            website: None,
            phone: None,
            email: None,
            address: None,
            careers: if i % 2 == 0 {
                vec!["Web Development".to_string()]
            } else {
                vec!["Data Science".to_string()]
            },
            housing: i % 2 == 0,
            job_assistance: false,
            job_guarantee: false,
            accept_gi: false,
        };
        created.push(BootcampRepo::create(pool, &input, None).await.unwrap());
    }
    created
}

// ---------------------------------------------------------------------------
// Pagination boundaries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn first_page_of_thirty_records(pool: PgPool) {
    seed_bootcamps(&pool, 30).await;

    let paged = fetch_paged::<Bootcamp>(&pool, &raw(&[]), None).await.unwrap();

    assert_eq!(paged.records.len(), 25);
    assert_eq!(paged.total, 30);
    assert_eq!(
        paged.pagination,
        PaginationDescriptor {
            next: Some(PageRef { page: 2, limit: 25 }),
            prev: None,
        }
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn second_page_of_thirty_records(pool: PgPool) {
    seed_bootcamps(&pool, 30).await;

    let paged = fetch_paged::<Bootcamp>(&pool, &raw(&[("page", "2")]), None)
        .await
        .unwrap();

    assert_eq!(paged.records.len(), 5);
    assert_eq!(
        paged.pagination,
        PaginationDescriptor {
            next: None,
            prev: Some(PageRef { page: 1, limit: 25 }),
        }
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn garbage_pagination_input_falls_back_to_defaults(pool: PgPool) {
    seed_bootcamps(&pool, 3).await;

    let paged = fetch_paged::<Bootcamp>(&pool, &raw(&[("page", "x"), ("limit", "-1")]), None)
        .await
        .unwrap();

    assert_eq!(paged.records.len(), 3);
    assert_eq!(paged.pagination, PaginationDescriptor::default());
}

// ---------------------------------------------------------------------------
// Filters, sorting, and the aggregate count
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn equality_and_membership_filters_narrow_the_page(pool: PgPool) {
    seed_bootcamps(&pool, 10).await;

    let housed = fetch_paged::<Bootcamp>(&pool, &raw(&[("housing", "true")]), None)
        .await
        .unwrap();
    assert_eq!(housed.records.len(), 5);
    assert!(housed.records.iter().all(|b| b.housing));

    let web = fetch_paged::<Bootcamp>(&pool, &raw(&[("careers", "Web Development")]), None)
        .await
        .unwrap();
    assert_eq!(web.records.len(), 5);

    let either = fetch_paged::<Bootcamp>(
        &pool,
        &raw(&[("careers[in]", "Web Development,Data Science")]),
        None,
    )
    .await
    .unwrap();
    assert_eq!(either.records.len(), 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn aggregate_count_ignores_active_filters(pool: PgPool) {
    // The pagination total is the whole collection, not the filtered subset.
    seed_bootcamps(&pool, 10).await;

    let housed = fetch_paged::<Bootcamp>(&pool, &raw(&[("housing", "true")]), None)
        .await
        .unwrap();

    assert_eq!(housed.records.len(), 5);
    assert_eq!(housed.total, 10);
}

#[sqlx::test(migrations = "./migrations")]
async fn sort_descending_by_name(pool: PgPool) {
    seed_bootcamps(&pool, 5).await;

    let paged = fetch_paged::<Bootcamp>(&pool, &raw(&[("sort", "-name")]), None)
        .await
        .unwrap();

    let names: Vec<&str> = paged.records.iter().map(|b| b.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.reverse();
    assert_eq!(names, sorted);
}

#[sqlx::test(migrations = "./migrations")]
async fn range_filter_on_course_tuition(pool: PgPool) {
    let bootcamp = seed_bootcamps(&pool, 1).await.remove(0);
    for tuition in [4000, 8000, 12000] {
        let input = CreateCourse {
            title: format!("Course {tuition}"),
            description: "A course".to_string(),
            weeks: 10,
            tuition,
            minimum_skill: "beginner".to_string(),
            scholarship_available: false,
        };
        CourseRepo::create(&pool, bootcamp.id, &input).await.unwrap();
    }

    let paged = fetch_paged::<Course>(&pool, &raw(&[("tuition[gte]", "8000")]), None)
        .await
        .unwrap();

    assert_eq!(paged.records.len(), 2);
    assert!(paged.records.iter().all(|c| c.tuition >= 8000));
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_filter_column_is_a_malformed_query(pool: PgPool) {
    let err = fetch_paged::<Bootcamp>(&pool, &raw(&[("password", "x")]), None)
        .await
        .unwrap_err();
    assert_matches!(err, PagedQueryError::Query(CoreError::MalformedQuery(_)));
}

// ---------------------------------------------------------------------------
// Populate hooks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn bootcamp_populate_attaches_courses(pool: PgPool) {
    let bootcamp = seed_bootcamps(&pool, 2).await.remove(0);
    let input = CreateCourse {
        title: "Front End".to_string(),
        description: "A course".to_string(),
        weeks: 12,
        tuition: 8000,
        minimum_skill: "beginner".to_string(),
        scholarship_available: false,
    };
    CourseRepo::create(&pool, bootcamp.id, &input).await.unwrap();

    let paged = fetch_paged::<Bootcamp>(&pool, &raw(&[]), Some(&BootcampPopulate::Courses))
        .await
        .unwrap();

    let with_course = paged
        .records
        .iter()
        .find(|b| b.id == bootcamp.id)
        .expect("seeded bootcamp in page");
    assert_eq!(with_course.courses.as_ref().map(Vec::len), Some(1));

    let without_course = paged
        .records
        .iter()
        .find(|b| b.id != bootcamp.id)
        .expect("other bootcamp in page");
    assert_eq!(without_course.courses.as_ref().map(Vec::len), Some(0));
}

#[sqlx::test(migrations = "./migrations")]
async fn course_populate_attaches_bootcamp_summary(pool: PgPool) {
    let bootcamp = seed_bootcamps(&pool, 1).await.remove(0);
    let input = CreateCourse {
        title: "Front End".to_string(),
        description: "A course".to_string(),
        weeks: 12,
        tuition: 8000,
        minimum_skill: "beginner".to_string(),
        scholarship_available: false,
    };
    CourseRepo::create(&pool, bootcamp.id, &input).await.unwrap();

    let paged = fetch_paged::<Course>(&pool, &raw(&[]), Some(&CoursePopulate::Bootcamp))
        .await
        .unwrap();

    let summary = paged.records[0]
        .bootcamp
        .as_ref()
        .expect("summary attached");
    assert_eq!(summary.id, bootcamp.id);
    assert_eq!(summary.name, bootcamp.name);
}
