//! Database row structs.
//!
//! Each submodule contains a `FromRow` struct matching the table row and a
//! conversion into the corresponding `marie-core` entity.

pub mod laboratory;
