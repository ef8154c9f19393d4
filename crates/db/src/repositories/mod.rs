//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod collaborator_repo;
pub mod project_repo;
pub mod task_repo;

pub use collaborator_repo::CollaboratorRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
