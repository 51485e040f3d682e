use tokio::sync::broadcast;

use crate::errors::BroadcastError;
use crate::models::BookingEvent;

const CAPACITY: usize = 256;

/// Fan-out of booking events to whichever staff sessions are connected right now.
/// Nothing is buffered for sessions that connect later.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<BookingEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Returns the number of sessions the event was handed to.
    pub fn emit(&self, event: BookingEvent) -> Result<usize, BroadcastError> {
        let name = event.name();
        self.tx
            .send(event)
            .map_err(|_| BroadcastError::NoSubscribers(name))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }

    pub fn session_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;

    fn updated() -> BookingEvent {
        BookingEvent::BookingUpdated {
            id: "b1".to_string(),
            status: BookingStatus::Approved,
        }
    }

    #[test]
    fn test_emit_without_sessions_is_an_error_not_a_panic() {
        let broadcaster = EventBroadcaster::new();
        assert_eq!(broadcaster.session_count(), 0);
        assert!(matches!(
            broadcaster.emit(updated()),
            Err(BroadcastError::NoSubscribers("bookingUpdated"))
        ));
    }

    #[tokio::test]
    async fn test_every_session_receives_event() {
        let broadcaster = EventBroadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe();

        assert_eq!(broadcaster.emit(updated()).unwrap(), 2);
        assert_eq!(first.recv().await.unwrap(), updated());
        assert_eq!(second.recv().await.unwrap(), updated());
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(updated()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"event": "bookingUpdated", "data": {"id": "b1", "status": "approved"}})
        );
    }
}
