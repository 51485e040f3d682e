pub mod booking;
pub mod event;

pub use booking::{
    Booking, BookingFilter, BookingPatch, BookingRequest, BookingStatus, NewBooking, TimeSlot,
};
pub use event::{BookingEvent, BookingSummary};
