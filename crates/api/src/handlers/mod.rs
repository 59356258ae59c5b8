//! HTTP handlers, grouped per resource.

pub mod bootcamps;
pub mod courses;
