use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::operations::learned_word::LearnedWord;
use crate::response::json_error;
use crate::services::learned_words::{self, MarkOutcome, RemoveOutcome};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_page_size")]
    page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PagedLearnedWords {
    items: Vec<LearnedWord>,
    total: i64,
    page: i64,
    page_size: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MarkRequest {
    word: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkData {
    #[serde(flatten)]
    record: LearnedWord,
    already_learned: bool,
}

pub async fn list_learned(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);

    match learned_words::list_learned(db.as_ref(), &user.id, page, page_size).await {
        Ok((items, total)) => Json(SuccessResponse {
            success: true,
            data: PagedLearnedWords {
                items,
                total,
                page,
                page_size,
            },
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "learned words listing failed");
            internal_error()
        }
    }
}

pub async fn mark_learned(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<MarkRequest>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let cache = state.learned_cache();
    match learned_words::mark_learned(db.as_ref(), cache.as_ref(), &user.id, &payload.word).await {
        Ok(MarkOutcome::Learned(record)) => Json(SuccessResponse {
            success: true,
            data: MarkData {
                record,
                already_learned: false,
            },
        })
        .into_response(),
        Ok(MarkOutcome::AlreadyLearned(record)) => Json(SuccessResponse {
            success: true,
            data: MarkData {
                record,
                already_learned: true,
            },
        })
        .into_response(),
        Ok(MarkOutcome::EmptyWord) => json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "word cannot be empty",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "mark learned failed");
            internal_error()
        }
    }
}

pub async fn remove_learned(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(word): Path<String>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let cache = state.learned_cache();
    match learned_words::remove_learned(db.as_ref(), cache.as_ref(), &user.id, &word).await {
        Ok(RemoveOutcome::Removed) => Json(SuccessResponse {
            success: true,
            data: serde_json::json!({ "message": "word removed from learned list" }),
        })
        .into_response(),
        Ok(RemoveOutcome::NotLearned) => json_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "word is not in the learned list",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "remove learned failed");
            internal_error()
        }
    }
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
