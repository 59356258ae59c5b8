//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod bootcamp_repo;
pub mod course_repo;

pub use bootcamp_repo::{BootcampPopulate, BootcampRepo};
pub use course_repo::{CoursePopulate, CourseRepo};
