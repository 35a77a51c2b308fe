pub mod dashboard;
pub mod laboratory;
