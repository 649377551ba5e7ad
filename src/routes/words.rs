use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::response::json_error;
use crate::services::word_selection::{self, WordSelection};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

pub async fn random_word(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match word_selection::random_unlearned_word(db.as_ref(), &user.id).await {
        Ok(WordSelection::Word(word)) => Json(SuccessResponse {
            success: true,
            data: word,
        })
        .into_response(),
        Ok(WordSelection::AllLearned) => json_error(
            StatusCode::NOT_FOUND,
            "ALL_WORDS_LEARNED",
            "all vocabulary words have been learned",
        )
        .into_response(),
        Ok(WordSelection::NoVocabulary) => json_error(
            StatusCode::NOT_FOUND,
            "NO_VOCABULARY",
            "no vocabulary words available",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "random word selection failed");
            internal_error()
        }
    }
}

pub async fn lookup_word(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Path(word): Path<String>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match state.dictionary().lookup(db.as_ref(), &word).await {
        Ok(Some(entry)) => Json(SuccessResponse {
            success: true,
            data: entry,
        })
        .into_response(),
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            "WORD_NOT_FOUND",
            "word not found in dictionary",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, word, "dictionary lookup failed");
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
