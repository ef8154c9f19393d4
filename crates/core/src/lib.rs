//! Domain building blocks for the CPM project/task service.
//!
//! This crate has zero internal deps so that the repository layer, the HTTP
//! layer and any future tooling share the same status rules, aggregation and
//! filtering logic.

pub mod aggregation;
pub mod error;
pub mod identity;
pub mod invite;
pub mod task_filter;
pub mod task_status;
pub mod types;
pub mod validation;
