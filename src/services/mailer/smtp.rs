use anyhow::Context;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::EmailTransport;
use crate::config::EmailConfig;
use crate::errors::NotifyError;

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpTransport {
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .context("failed to configure SMTP relay")?
        .port(config.smtp_port);

        let builder = if config.smtp_user.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ))
        };

        let from = config
            .from_header()
            .parse::<Mailbox>()
            .context("EMAIL_FROM is not a valid address")?;

        Ok(Self {
            mailer: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress(format!("{to}: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| NotifyError::Transport(format!("failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(format!("SMTP send failed: {e}")))?;

        Ok(())
    }
}
