use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::response::json_error;
use crate::services::quiz::{self, AnswerOutcome};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

/// The question as served to clients. The correct answer is never exposed
/// here; it only travels in the grading response.
#[derive(Serialize)]
struct QuestionData {
    id: String,
    word: String,
    choices: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnswerRequest {
    question_id: String,
    answer: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerData {
    correct: bool,
    correct_answer: String,
    already_completed: bool,
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
struct PagedCorrectAnswers {
    items: Vec<crate::db::operations::quiz::CorrectAnswerEntry>,
    total: i64,
    page: i64,
    page_size: i64,
}

pub async fn random_question(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match quiz::random_question(db.as_ref(), &user.id).await {
        Ok(Some(question)) => {
            let mut choices = question.wrong_answers.clone();
            choices.push(question.correct_answer.clone());
            choices.shuffle(&mut rand::rng());

            Json(SuccessResponse {
                success: true,
                data: QuestionData {
                    id: question.id,
                    word: question.word,
                    choices,
                },
            })
            .into_response()
        }
        Ok(None) => json_error(
            StatusCode::NOT_FOUND,
            "NO_QUESTIONS_LEFT",
            "no unanswered quiz questions available",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "quiz question selection failed");
            internal_error()
        }
    }
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AnswerRequest>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match quiz::submit_answer(db.as_ref(), &user.id, &payload.question_id, &payload.answer).await {
        Ok(AnswerOutcome::Graded {
            correct,
            correct_answer,
            already_completed,
        }) => Json(SuccessResponse {
            success: true,
            data: AnswerData {
                correct,
                correct_answer,
                already_completed,
            },
        })
        .into_response(),
        Ok(AnswerOutcome::QuestionNotFound) => json_error(
            StatusCode::NOT_FOUND,
            "QUESTION_NOT_FOUND",
            "quiz question not found",
        )
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "quiz answer submission failed");
            internal_error()
        }
    }
}

pub async fn statistics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    match quiz::statistics(db.as_ref(), &user.id).await {
        Ok(stats) => Json(SuccessResponse {
            success: true,
            data: stats,
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "quiz statistics failed");
            internal_error()
        }
    }
}

pub async fn correct_answers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Response {
    let Some(db) = state.db() else {
        return service_unavailable();
    };

    let page = query.page.max(1);
    let page_size = query.page_size.clamp(1, 100);

    match quiz::correct_answers(db.as_ref(), &user.id, page, page_size).await {
        Ok((items, total)) => Json(SuccessResponse {
            success: true,
            data: PagedCorrectAnswers {
                items,
                total,
                page,
                page_size,
            },
        })
        .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "correct answers listing failed");
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
