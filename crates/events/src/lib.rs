//! Marie laboratory event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`LaboratoryEvent`]: lifecycle changes and user intents for a laboratory.
//! - [`EventLogger`]: background subscriber that writes every event to the
//!   tracing log.

pub mod bus;
pub mod logger;

pub use bus::{EventBus, EventKind, LaboratoryEvent};
pub use logger::EventLogger;
