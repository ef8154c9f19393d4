pub mod access;
pub mod project;
pub mod task;
