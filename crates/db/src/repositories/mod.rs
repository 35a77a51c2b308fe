//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod laboratory_repo;

pub use laboratory_repo::LaboratoryRepo;
