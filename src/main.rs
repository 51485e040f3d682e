use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing_subscriber::EnvFilter;

use bookingdesk::auth::{sign_token, Claims};
use bookingdesk::config::AppConfig;
use bookingdesk::db;
use bookingdesk::handlers;
use bookingdesk::services::mailer;
use bookingdesk::state::AppState;

const DEFAULT_TOKEN_HOURS: i64 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    // `bookingdesk token <actor-id> [hours]` prints a staff token and exits.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("token") {
        return print_token(&config, &args[1..]);
    }

    let conn = db::init_db(&config.database_url)?;
    let transport = mailer::from_config(&config.email)?;

    if config.admin_email.is_empty() {
        tracing::warn!("ADMIN_EMAIL not set, staff will not be emailed about new bookings");
    }
    if config.jwt_secret == "changeme" {
        tracing::warn!("JWT_SECRET is the default value, set it before going to production");
    }

    let state = Arc::new(AppState::new(config.clone(), conn, transport));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_token(config: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let actor_id = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("usage: bookingdesk token <actor-id> [hours]"))?;
    let hours = match args.get(1) {
        Some(h) => h
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("hours must be a whole number, got {h}"))?,
        None => DEFAULT_TOKEN_HOURS,
    };

    let claims = Claims {
        sub: actor_id.clone(),
        role: Some("admin".to_string()),
        exp: (Utc::now() + Duration::hours(hours)).timestamp(),
    };
    println!("{}", sign_token(&config.jwt_secret, &claims)?);
    Ok(())
}
