use std::env;

#[derive(Clone, Debug, PartialEq)]
pub enum EmailProviderKind {
    Smtp,
    Http,
    Log,
}

impl EmailProviderKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "smtp" => EmailProviderKind::Smtp,
            "http" | "api" => EmailProviderKind::Http,
            _ => EmailProviderKind::Log,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_url: String,
    pub cors_origin: Option<String>,
    pub email: EmailConfig,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub provider: EmailProviderKind,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "bookingdesk.db".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "changeme".to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_default(),
            admin_url: env::var("ADMIN_URL")
                .unwrap_or_else(|_| "http://localhost:5173/admin".to_string()),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            email: EmailConfig::from_env(),
        }
    }

    /// Deep link staff follow from the new-booking email.
    pub fn admin_bookings_url(&self) -> String {
        format!("{}/bookings", self.admin_url.trim_end_matches('/'))
    }
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            provider: EmailProviderKind::parse(
                &env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "log".to_string()),
            ),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("SMTP_USER").unwrap_or_default(),
            smtp_pass: env::var("SMTP_PASS").unwrap_or_default(),
            api_url: env::var("EMAIL_API_URL").unwrap_or_default(),
            api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
            from_address: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@localhost".to_string()),
            from_name: env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "Property Bookings".to_string()),
            timeout_secs: env::var("EMAIL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(5),
        }
    }

    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}
