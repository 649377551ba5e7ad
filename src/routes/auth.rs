use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::operations::user;
use crate::response::json_error;
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
struct AuthData {
    user: AuthUser,
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let username = payload.username.trim().to_string();
    if username.is_empty() || username.len() > 50 {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "username must be 1-50 characters",
        )
        .into_response();
    }
    if payload.password.len() < 6 {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "password must be at least 6 characters",
        )
        .into_response();
    }

    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match user::get_user_by_username(db.as_ref(), &username).await {
        Ok(Some(_)) => {
            return json_error(StatusCode::CONFLICT, "CONFLICT", "username already taken")
                .into_response();
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "register username lookup failed");
            return internal_error();
        }
    }

    let password_hash = match bcrypt::hash(&payload.password, 10) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::warn!(error = %err, "password hash failed");
            return internal_error();
        }
    };

    let record = match user::create_user(db.as_ref(), &username, &password_hash).await {
        Ok(record) => record,
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            return json_error(StatusCode::CONFLICT, "CONFLICT", "username already taken")
                .into_response();
        }
        Err(err) => {
            tracing::warn!(error = %err, "user insert failed");
            return internal_error();
        }
    };

    issue_session(&state, record).await
}

pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let record = match user::get_user_by_username(db.as_ref(), payload.username.trim()).await {
        Ok(Some(record)) => record,
        Ok(None) => return invalid_credentials(),
        Err(err) => {
            tracing::warn!(error = %err, "login user lookup failed");
            return internal_error();
        }
    };

    match bcrypt::verify(&payload.password, &record.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(err) => {
            tracing::warn!(error = %err, "password verify failed");
            return internal_error();
        }
    }

    issue_session(&state, record).await
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    // require_auth already validated the token; it is present here.
    if let Some(token) = crate::auth::extract_token(&headers) {
        let token_hash = crate::auth::hash_token(&token);
        if let Err(err) = user::delete_session_by_token_hash(db.as_ref(), &token_hash).await {
            tracing::warn!(error = %err, "logout session delete failed");
            return internal_error();
        }
    }

    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) =
        HeaderValue::from_str("auth_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    {
        response_headers.insert(header::SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        response_headers,
        Json(MessageResponse {
            success: true,
            message: "logged out",
        }),
    )
        .into_response()
}

pub async fn me(Extension(user): Extension<AuthUser>) -> Response {
    Json(SuccessResponse {
        success: true,
        data: user,
    })
    .into_response()
}

async fn issue_session(state: &AppState, record: user::User) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let (token, expires_at) = match crate::auth::sign_jwt_for_user(&record.id) {
        Ok(signed) => signed,
        Err(err) => {
            tracing::warn!(error = %err, "token signing failed");
            return internal_error();
        }
    };

    let token_hash = crate::auth::hash_token(&token);
    if let Err(err) =
        user::create_session(db.as_ref(), &record.id, &token_hash, expires_at).await
    {
        tracing::warn!(error = %err, "session insert failed");
        return internal_error();
    }

    let max_age = (expires_at - chrono::Utc::now()).num_seconds().max(0);
    let mut headers = HeaderMap::new();
    if let Ok(cookie) = HeaderValue::from_str(&format!(
        "auth_token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
    )) {
        headers.insert(header::SET_COOKIE, cookie);
    }

    (
        StatusCode::OK,
        headers,
        Json(SuccessResponse {
            success: true,
            data: AuthData {
                user: AuthUser {
                    id: record.id,
                    username: record.username,
                    role: record.role,
                    created_at: record.created_at,
                },
                token,
            },
        }),
    )
        .into_response()
}

fn invalid_credentials() -> Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "UNAUTHORIZED",
        "invalid username or password",
    )
    .into_response()
}

fn service_unavailable() -> Response {
    json_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "SERVICE_UNAVAILABLE",
        "database unavailable",
    )
    .into_response()
}

fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "internal server error",
    )
    .into_response()
}
