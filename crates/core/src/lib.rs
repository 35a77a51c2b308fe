//! Laboratory domain logic for the Marie knowledge dashboard.
//!
//! Everything in this crate is free of database and HTTP dependencies.
//! Laboratory records are supplied by a [`store::LaboratoryStore`]
//! implementation chosen by the caller.

pub mod dashboard;
pub mod error;
pub mod intent;
pub mod laboratory;
pub mod presentation;
pub mod store;
pub mod types;
