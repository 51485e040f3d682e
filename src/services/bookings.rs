use std::sync::Arc;

use crate::db::store::{now_utc, BookingStore};
use crate::errors::AppError;
use crate::models::{Booking, BookingEvent, BookingPatch, BookingRequest, BookingStatus};
use crate::services::broadcaster::EventBroadcaster;
use crate::services::notifications::NotificationDispatcher;

/// Ties a booking mutation to its email and live-event side effects.
///
/// Only the store write decides the outcome. Emails run on a spawned task and
/// broadcasts are fire-and-forget. The dispatcher logs each failed send and the
/// error goes no further.
#[derive(Clone)]
pub struct BookingCoordinator {
    store: BookingStore,
    dispatcher: Arc<NotificationDispatcher>,
    broadcaster: EventBroadcaster,
}

impl BookingCoordinator {
    pub fn new(
        store: BookingStore,
        dispatcher: Arc<NotificationDispatcher>,
        broadcaster: EventBroadcaster,
    ) -> Self {
        Self {
            store,
            dispatcher,
            broadcaster,
        }
    }

    /// Stores a public viewing request, then notifies the customer, staff and live dashboards.
    ///
    /// Identical retries create separate bookings.
    pub fn submit_booking(&self, request: BookingRequest) -> Result<Booking, AppError> {
        let booking = self.store.create(request)?;
        tracing::info!(
            booking_id = %booking.id,
            property = booking.property_label(),
            date = %booking.preferred_date,
            time = %booking.preferred_time,
            "booking submitted"
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let created = booking.clone();
        tokio::spawn(async move {
            let _ = dispatcher.notify_booking_created(&created).await;
        });

        self.publish(BookingEvent::created(&booking));
        Ok(booking)
    }

    /// Applies a staff decision. Any status may follow any other.
    ///
    /// `admin_notes` replaces the stored notes; `None` or blank clears them.
    /// `responded_at`/`responded_by` are overwritten on every call, so they
    /// describe the latest response rather than the first.
    pub fn update_status(
        &self,
        id: &str,
        status: BookingStatus,
        admin_notes: Option<String>,
        actor_id: &str,
    ) -> Result<Booking, AppError> {
        let patch = BookingPatch {
            status: Some(status),
            admin_notes: Some(
                admin_notes
                    .map(|notes| notes.trim().to_string())
                    .filter(|notes| !notes.is_empty()),
            ),
            responded_at: Some(now_utc()),
            responded_by: Some(actor_id.to_string()),
            ..BookingPatch::default()
        };
        let booking = self.store.update(id, &patch)?;
        tracing::info!(
            booking_id = %booking.id,
            status = %status,
            actor = actor_id,
            "booking status updated"
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let updated = booking.clone();
        tokio::spawn(async move {
            let _ = dispatcher.notify_status_changed(&updated).await;
        });

        self.publish(BookingEvent::updated(&booking));
        Ok(booking)
    }

    /// Staff detail view: opening a booking marks it read.
    pub fn view_booking(&self, id: &str) -> Result<Booking, AppError> {
        let booking = self.store.get(id)?;
        if booking.is_read {
            return Ok(booking);
        }
        let patch = BookingPatch {
            is_read: Some(true),
            ..BookingPatch::default()
        };
        self.store.update(id, &patch)
    }

    fn publish(&self, event: BookingEvent) {
        let name = event.name();
        match self.broadcaster.emit(event) {
            Ok(sessions) => tracing::debug!(event = name, sessions, "booking event broadcast"),
            Err(e) => tracing::debug!(error = %e, "booking event not delivered"),
        }
    }
}
