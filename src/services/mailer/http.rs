use async_trait::async_trait;

use super::EmailTransport;
use crate::errors::NotifyError;

/// Transactional email API that accepts `{from, to, subject, html}` JSON.
pub struct HttpEmailTransport {
    api_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl HttpEmailTransport {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            api_url,
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EmailTransport for HttpEmailTransport {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), NotifyError> {
        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(format!("email API request failed: {e}")))?
            .error_for_status()
            .map_err(|e| NotifyError::Transport(format!("email API returned error: {e}")))?;

        Ok(())
    }
}
