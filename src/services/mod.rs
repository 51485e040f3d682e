pub mod bookings;
pub mod broadcaster;
pub mod mailer;
pub mod notifications;
pub mod templates;
