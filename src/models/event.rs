use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::{Booking, BookingStatus, TimeSlot};

/// Lifecycle event pushed to connected staff sessions.
///
/// Serialized as `{"event": "<name>", "data": {...}}` so socket and SSE
/// clients can dispatch on the name. Statuses use the same lowercase strings
/// as the REST API (`{"id": "...", "status": "approved"}`), not display labels.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum BookingEvent {
    #[serde(rename = "newBooking")]
    NewBooking(BookingSummary),
    #[serde(rename = "bookingUpdated")]
    BookingUpdated { id: String, status: BookingStatus },
}

impl BookingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BookingEvent::NewBooking(_) => "newBooking",
            BookingEvent::BookingUpdated { .. } => "bookingUpdated",
        }
    }

    pub fn created(booking: &Booking) -> Self {
        BookingEvent::NewBooking(BookingSummary::from(booking))
    }

    pub fn updated(booking: &Booking) -> Self {
        BookingEvent::BookingUpdated {
            id: booking.id.clone(),
            status: booking.status,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct BookingSummary {
    pub id: String,
    pub name: String,
    pub project_name: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: TimeSlot,
    pub created_at: NaiveDateTime,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            name: booking.name.clone(),
            project_name: booking.property_label().to_string(),
            preferred_date: booking.preferred_date,
            preferred_time: booking.preferred_time,
            created_at: booking.created_at,
        }
    }
}
