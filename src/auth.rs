use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::errors::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

const JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;
const STAFF_ROLES: &[&str] = &["admin", "staff", "superadmin"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(alias = "id")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64,
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

fn mac(secret: &str) -> Result<HmacSha256, hmac::digest::InvalidLength> {
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
}

pub fn sign_token(secret: &str, claims: &Claims) -> anyhow::Result<String> {
    let header = URL_SAFE_NO_PAD.encode(JWT_HEADER);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
    let signing_input = format!("{header}.{payload}");

    let mut mac = mac(secret).map_err(|_| anyhow::anyhow!("invalid JWT secret"))?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature}"))
}

/// Verifies an HS256 token and returns its claims if it belongs to an unexpired staff member.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let mut parts = token.split('.');
    let (Some(header_part), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::Unauthorized);
    };

    let header_json = URL_SAFE_NO_PAD
        .decode(header_part)
        .map_err(|_| AppError::Unauthorized)?;
    let header: Header =
        serde_json::from_slice(&header_json).map_err(|_| AppError::Unauthorized)?;
    if header.alg != "HS256" {
        return Err(AppError::Unauthorized);
    }

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AppError::Unauthorized)?;
    let mut mac = match mac(secret) {
        Ok(m) => m,
        Err(_) => return Err(AppError::Unauthorized),
    };
    mac.update(format!("{header_part}.{payload}").as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AppError::Unauthorized)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::Unauthorized)?;
    let claims: Claims =
        serde_json::from_slice(&payload).map_err(|_| AppError::Unauthorized)?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AppError::Unauthorized);
    }
    if let Some(role) = claims.role.as_deref() {
        if !STAFF_ROLES.contains(&role) {
            return Err(AppError::Unauthorized);
        }
    }

    Ok(claims)
}

/// Authenticated staff member, taken from `Authorization: Bearer <jwt>`.
pub struct Staff {
    pub actor_id: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for Staff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let claims = verify_token(&state.config.jwt_secret, token)?;
        Ok(Staff {
            actor_id: claims.sub,
        })
    }
}
