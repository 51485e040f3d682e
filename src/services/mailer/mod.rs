pub mod http;
pub mod logging;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{EmailConfig, EmailProviderKind};
use crate::errors::NotifyError;

/// Outbound transactional email.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError>;
}

pub fn from_config(config: &EmailConfig) -> anyhow::Result<Arc<dyn EmailTransport>> {
    let transport: Arc<dyn EmailTransport> = match config.provider {
        EmailProviderKind::Smtp => {
            anyhow::ensure!(
                !config.smtp_host.is_empty(),
                "SMTP_HOST must be set when EMAIL_PROVIDER=smtp"
            );
            tracing::info!("using SMTP email transport (host: {})", config.smtp_host);
            Arc::new(smtp::SmtpTransport::new(config)?)
        }
        EmailProviderKind::Http => {
            anyhow::ensure!(
                !config.api_url.is_empty() && !config.api_key.is_empty(),
                "EMAIL_API_URL and EMAIL_API_KEY must be set when EMAIL_PROVIDER=http"
            );
            tracing::info!("using HTTP email transport (url: {})", config.api_url);
            Arc::new(http::HttpEmailTransport::new(
                config.api_url.clone(),
                config.api_key.clone(),
                config.from_header(),
            ))
        }
        EmailProviderKind::Log => {
            tracing::warn!("EMAIL_PROVIDER=log, emails will only be logged");
            Arc::new(logging::LogTransport)
        }
    };
    Ok(transport)
}
