//! Tests for the list response envelope: serialization shape, pagination
//! sides, and field selection. Pages are constructed directly, so no
//! database is needed.

use chrono::{TimeZone, Utc};
use serde_json::json;

use campdex_api::response::{list_response, CollectionResponse, DataResponse};
use campdex_core::query::PaginationDescriptor;
use campdex_db::models::course::Course;
use campdex_db::paged::Paged;

fn course(id: i64, title: &str, tuition: i32) -> Course {
    Course {
        id,
        bootcamp_id: 1,
        title: title.to_string(),
        description: "A course".to_string(),
        weeks: 12,
        tuition,
        minimum_skill: "beginner".to_string(),
        scholarship_available: false,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        bootcamp: None,
    }
}

#[test]
fn list_envelope_has_success_count_pagination_and_data() {
    let paged = Paged {
        records: vec![course(1, "Front End", 8000), course(2, "Back End", 11000)],
        pagination: PaginationDescriptor::build(1, 25, 30),
        total: 30,
        select: None,
    };

    let envelope = list_response(paged).unwrap();
    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(value["success"], true);
    assert_eq!(value["count"], 2);
    assert_eq!(value["pagination"], json!({ "next": { "page": 2, "limit": 25 } }));
    assert_eq!(value["data"][0]["title"], "Front End");
    // Unpopulated relations stay out of the JSON entirely.
    assert!(value["data"][0].get("bootcamp").is_none());
}

#[test]
fn select_projects_each_record_to_chosen_fields_plus_id() {
    let paged = Paged {
        records: vec![course(1, "Front End", 8000)],
        pagination: PaginationDescriptor::default(),
        total: 1,
        select: Some(vec!["title".to_string(), "tuition".to_string()]),
    };

    let envelope = list_response(paged).unwrap();
    let value = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
        value["data"][0],
        json!({ "id": 1, "title": "Front End", "tuition": 8000 })
    );
}

#[test]
fn single_record_envelope_is_success_plus_data() {
    let value = serde_json::to_value(DataResponse::new(course(7, "Front End", 8000))).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["data"]["id"], 7);
}

#[test]
fn collection_envelope_counts_its_records() {
    let value = serde_json::to_value(CollectionResponse::new(vec![
        course(1, "Front End", 8000),
        course(2, "Back End", 11000),
    ]))
    .unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["count"], 2);
    assert!(value.get("pagination").is_none());
}
