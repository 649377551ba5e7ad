mod auth;
mod health;
mod learned;
mod quiz;
mod words;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::middleware::auth::require_auth;
use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/words/random", get(words::random_word))
        .route("/api/words/:word", get(words::lookup_word))
        .route(
            "/api/learned-words",
            get(learned::list_learned).post(learned::mark_learned),
        )
        .route("/api/learned-words/:word", delete(learned::remove_learned))
        .route("/api/quiz/question", get(quiz::random_question))
        .route("/api/quiz/answer", post(quiz::submit_answer))
        .route("/api/quiz/statistics", get(quiz::statistics))
        .route("/api/quiz/correct-answers", get(quiz::correct_answers))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest("/health", health::router())
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "resource not found").into_response()
}
