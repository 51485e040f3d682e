use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::NotifyError;
use crate::models::Booking;
use crate::services::mailer::EmailTransport;
use crate::services::templates::{self, EmailContent};

/// Turns booking lifecycle events into customer and staff emails.
///
/// Every send is bounded by `timeout`; a slow relay counts as a failed delivery.
/// Failed sends are logged here, so callers may drop the returned error.
pub struct NotificationDispatcher {
    transport: Arc<dyn EmailTransport>,
    staff_email: String,
    admin_bookings_url: String,
    timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        staff_email: String,
        admin_bookings_url: String,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            staff_email,
            admin_bookings_url,
            timeout,
        }
    }

    pub fn from_config(transport: Arc<dyn EmailTransport>, config: &AppConfig) -> Self {
        Self::new(
            transport,
            config.admin_email.clone(),
            config.admin_bookings_url(),
            Duration::from_secs(config.email.timeout_secs),
        )
    }

    async fn deliver(
        &self,
        recipient: &'static str,
        booking_id: &str,
        to: &str,
        content: EmailContent,
    ) -> Result<(), NotifyError> {
        let send = self.transport.send(to, &content.subject, &content.html);
        let result = match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.timeout.as_secs())),
        };

        if let Err(e) = &result {
            tracing::warn!(
                recipient,
                booking_id,
                error = %e,
                subject = %content.subject,
                "email delivery failed"
            );
        }
        result
    }

    /// Sends the customer confirmation and the staff alert concurrently.
    /// Both are attempted; the first failure is returned.
    pub async fn notify_booking_created(&self, booking: &Booking) -> Result<(), NotifyError> {
        let customer = self.deliver(
            "customer",
            &booking.id,
            &booking.email,
            templates::customer_confirmation(booking),
        );
        let staff = async {
            if self.staff_email.is_empty() {
                tracing::warn!(
                    booking_id = %booking.id,
                    "ADMIN_EMAIL not configured, skipping staff notification"
                );
                return Err(NotifyError::NotConfigured("ADMIN_EMAIL"));
            }
            self.deliver(
                "staff",
                &booking.id,
                &self.staff_email,
                templates::staff_notification(booking, &self.admin_bookings_url),
            )
            .await
        };

        let (customer, staff) = tokio::join!(customer, staff);
        customer.and(staff)
    }

    pub async fn notify_status_changed(&self, booking: &Booking) -> Result<(), NotifyError> {
        self.deliver(
            "customer",
            &booking.id,
            &booking.email,
            templates::status_update(booking),
        )
        .await
    }
}
