use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::db::operations::user;
use crate::db::Database;

const AUTH_COOKIE_NAME: &str = "auth_token";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("missing JWT_SECRET")]
    MissingSecret,
    #[error("invalid JWT_EXPIRES_IN")]
    InvalidExpiresIn,
    #[error("database error: {0}")]
    Database(String),
}

pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = get_cookie(headers, AUTH_COOKIE_NAME) {
        return Some(token);
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    auth_header
        .strip_prefix("Bearer ")
        .map(|value| value.to_string())
}

/// Validates the token signature, then checks the session row and loads the
/// user. A revoked session (logout) fails even while the JWT is unexpired.
pub async fn verify_request_token(db: &Database, token: &str) -> Result<AuthUser, AuthError> {
    let secret = std::env::var("JWT_SECRET").map_err(|_| AuthError::MissingSecret)?;
    let claims = verify_jwt_hs256(token, &secret)?;

    let token_hash = hash_token(token);
    let session = user::get_session_by_token_hash(db, &token_hash)
        .await
        .map_err(|err| AuthError::Database(err.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    if session.user_id != claims.user_id {
        return Err(AuthError::InvalidToken);
    }

    let expires_at = DateTime::parse_from_rfc3339(&session.expires_at)
        .map_err(|_| AuthError::InvalidToken)?
        .with_timezone(&Utc);
    if expires_at < Utc::now() {
        return Err(AuthError::InvalidToken);
    }

    let record = user::get_user_by_id(db, &claims.user_id)
        .await
        .map_err(|err| AuthError::Database(err.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    Ok(AuthUser {
        id: record.id,
        username: record.username,
        role: record.role,
        created_at: record.created_at,
    })
}

#[derive(Debug, Clone)]
struct JwtClaims {
    user_id: String,
}

fn verify_jwt_hs256(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(AuthError::InvalidToken)?;
    let payload_b64 = parts.next().ok_or(AuthError::InvalidToken)?;
    let sig_b64 = parts.next().ok_or(AuthError::InvalidToken)?;
    if parts.next().is_some() {
        return Err(AuthError::InvalidToken);
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    let payload_bytes = URL_SAFE_NO_PAD
        .decode(payload_b64.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;
    let sig_bytes = URL_SAFE_NO_PAD
        .decode(sig_b64.as_bytes())
        .map_err(|_| AuthError::InvalidToken)?;

    let header_json: serde_json::Value =
        serde_json::from_slice(&header_bytes).map_err(|_| AuthError::InvalidToken)?;
    let alg = header_json
        .get("alg")
        .and_then(|value| value.as_str())
        .ok_or(AuthError::InvalidToken)?;
    if alg != "HS256" {
        return Err(AuthError::InvalidToken);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
    mac.update(format!("{header_b64}.{payload_b64}").as_bytes());
    mac.verify_slice(&sig_bytes)
        .map_err(|_| AuthError::InvalidToken)?;

    let payload_json: serde_json::Value =
        serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::InvalidToken)?;

    let now = Utc::now().timestamp();
    if let Some(exp) = payload_json.get("exp").and_then(|value| value.as_i64()) {
        if now >= exp {
            return Err(AuthError::InvalidToken);
        }
    }

    let user_id = payload_json
        .get("userId")
        .and_then(|value| value.as_str())
        .ok_or(AuthError::InvalidToken)?
        .to_string();

    Ok(JwtClaims { user_id })
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn sign_jwt_for_user(user_id: &str) -> Result<(String, DateTime<Utc>), AuthError> {
    let secret = std::env::var("JWT_SECRET").map_err(|_| AuthError::MissingSecret)?;
    let expires_in = std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| "24h".to_string());

    let expires_in_ms = parse_expires_in_ms(&expires_in)?;

    let issued_at = Utc::now();
    let exp = issued_at
        .checked_add_signed(chrono::Duration::milliseconds(expires_in_ms))
        .ok_or(AuthError::InvalidExpiresIn)?;

    let header_json = serde_json::json!({
        "alg": "HS256",
        "typ": "JWT",
    });

    let payload_json = serde_json::json!({
        "userId": user_id,
        "iat": issued_at.timestamp(),
        "exp": exp.timestamp(),
    });

    let header_b64 = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(&header_json).map_err(|_| AuthError::InvalidToken)?);
    let payload_b64 = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(&payload_json).map_err(|_| AuthError::InvalidToken)?);
    let signing_input = format!("{header_b64}.{payload_b64}");

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| AuthError::InvalidToken)?;
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();
    let sig_b64 = URL_SAFE_NO_PAD.encode(signature);

    Ok((format!("{signing_input}.{sig_b64}"), exp))
}

fn parse_expires_in_ms(value: &str) -> Result<i64, AuthError> {
    let trimmed = value.trim();
    if trimmed.len() < 2 {
        return Err(AuthError::InvalidExpiresIn);
    }

    let (digits, unit) = trimmed.split_at(trimmed.len() - 1);
    let amount: i64 = digits.parse().map_err(|_| AuthError::InvalidExpiresIn)?;
    if amount <= 0 {
        return Err(AuthError::InvalidExpiresIn);
    }

    match unit {
        "s" => Ok(amount * 1000),
        "m" => Ok(amount * 60 * 1000),
        "h" => Ok(amount * 60 * 60 * 1000),
        "d" => Ok(amount * 24 * 60 * 60 * 1000),
        _ => Err(AuthError::InvalidExpiresIn),
    }
}

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in raw.split(';') {
        let trimmed = part.trim();
        let (key, value) = trimmed.split_once('=')?;
        if key == name {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_in_parsing() {
        assert_eq!(parse_expires_in_ms("30s").unwrap(), 30_000);
        assert_eq!(parse_expires_in_ms("15m").unwrap(), 900_000);
        assert_eq!(parse_expires_in_ms("24h").unwrap(), 86_400_000);
        assert!(parse_expires_in_ms("h").is_err());
        assert!(parse_expires_in_ms("0d").is_err());
        assert!(parse_expires_in_ms("10x").is_err());
    }

    #[test]
    fn sign_then_verify_signature_roundtrip() {
        std::env::set_var("JWT_SECRET", "test-secret");
        let (token, _exp) = sign_jwt_for_user("user-1").unwrap();
        let claims = verify_jwt_hs256(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert!(verify_jwt_hs256(&token, "other-secret").is_err());
    }
}
