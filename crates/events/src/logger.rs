//! Tracing sink for laboratory events.
//!
//! [`EventLogger`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! logs every received [`LaboratoryEvent`]. It shuts down when the bus is
//! dropped.

use tokio::sync::broadcast;

use crate::bus::LaboratoryEvent;

/// Background service that logs laboratory events.
pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events logged, which tests use to check that
    /// nothing was dropped.
    pub async fn run(mut receiver: broadcast::Receiver<LaboratoryEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        event = event.name(),
                        laboratory_id = event.laboratory_id,
                        timestamp = %event.timestamp,
                        "Laboratory event"
                    );
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
        logged
    }
}

#[cfg(test)]
mod tests {
    use marie_core::intent::LaboratoryIntent;

    use super::*;
    use crate::bus::{EventBus, EventKind};

    #[tokio::test]
    async fn logs_until_bus_is_dropped() {
        let bus = EventBus::default();
        let handle = tokio::spawn(EventLogger::run(bus.subscribe()));

        bus.publish(LaboratoryEvent::new(EventKind::Created, 1));
        bus.publish(LaboratoryEvent::new(EventKind::Intent(LaboratoryIntent::Select), 1));
        drop(bus);

        assert_eq!(handle.await.unwrap(), 2);
    }
}
