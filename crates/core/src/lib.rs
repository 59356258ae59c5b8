//! Domain logic shared by the campdex backend crates.
//!
//! This crate has no internal dependencies so the query grammar, validation
//! helpers, and shared types can be used by the API/repository layer and any
//! future CLI or worker tooling alike.

pub mod course;
pub mod error;
pub mod geo;
pub mod query;
pub mod slug;
pub mod types;
