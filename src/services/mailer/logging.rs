use async_trait::async_trait;

use super::EmailTransport;
use crate::errors::NotifyError;

/// Development transport: records the email in the log instead of sending it.
pub struct LogTransport;

#[async_trait]
impl EmailTransport for LogTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        tracing::info!(to, subject, bytes = html.len(), "email not sent (log transport)");
        Ok(())
    }
}
