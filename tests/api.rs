mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, create_test_app, delete, get, post_json, register_user, send};
use vocab_backend::db::operations::{quiz, vocabulary};

#[tokio::test]
async fn health_reports_connected_database() {
    let (app, _db) = create_test_app().await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn liveness_and_info_do_not_require_auth() {
    let (app, _db) = create_test_app().await;

    let live = send(&app, get("/health/live", None)).await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(body_json(live).await["status"], "healthy");

    let info = send(&app, get("/health/info", None)).await;
    assert_eq!(info.status(), StatusCode::OK);
    let body = body_json(info).await;
    assert_eq!(body["service"], "vocab-backend");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let (app, _db) = create_test_app().await;

    let response = send(&app, get("/api/nope", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn protected_routes_reject_missing_token() {
    let (app, _db) = create_test_app().await;

    for uri in [
        "/api/auth/me",
        "/api/words/random",
        "/api/learned-words",
        "/api/quiz/question",
        "/api/quiz/statistics",
    ] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri {uri}");
        assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn register_validates_input() {
    let (app, _db) = create_test_app().await;

    let empty_name = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            json!({ "username": "   ", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(empty_name.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(empty_name).await["code"], "VALIDATION_ERROR");

    let short_password = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            json!({ "username": "alice", "password": "short" }),
        ),
    )
    .await;
    assert_eq!(short_password.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "alice").await;

    let response = send(
        &app,
        post_json(
            "/api/auth/register",
            None,
            json!({ "username": "alice", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[tokio::test]
async fn login_me_logout_round_trip() {
    let (app, _db) = create_test_app().await;
    register_user(&app, "bob").await;

    let wrong = send(
        &app,
        post_json(
            "/api/auth/login",
            None,
            json!({ "username": "bob", "password": "not-the-password" }),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let login = send(
        &app,
        post_json(
            "/api/auth/login",
            None,
            json!({ "username": "bob", "password": "password123" }),
        ),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    let login_body = body_json(login).await;
    let token = login_body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(login_body["data"]["user"]["username"], "bob");

    let me = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(body_json(me).await["data"]["username"], "bob");

    let logout = send(&app, post_json("/api/auth/logout", Some(&token), json!({}))).await;
    assert_eq!(logout.status(), StatusCode::OK);

    // Session row is gone, the signed token no longer grants access.
    let me_after = send(&app, get("/api/auth/me", Some(&token))).await;
    assert_eq!(me_after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn random_word_distinguishes_empty_cases() {
    let (app, db) = create_test_app().await;
    let token = register_user(&app, "carol").await;

    let no_vocab = send(&app, get("/api/words/random", Some(&token))).await;
    assert_eq!(no_vocab.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(no_vocab).await["code"], "NO_VOCABULARY");

    vocabulary::insert_vocabulary(db.as_ref(), "abandon", Some("to give up"), None)
        .await
        .unwrap();

    let served = send(&app, get("/api/words/random", Some(&token))).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_json(served).await["data"]["word"], "abandon");

    let marked = send(
        &app,
        post_json("/api/learned-words", Some(&token), json!({ "word": "abandon" })),
    )
    .await;
    assert_eq!(marked.status(), StatusCode::OK);

    let all_learned = send(&app, get("/api/words/random", Some(&token))).await;
    assert_eq!(all_learned.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(all_learned).await["code"], "ALL_WORDS_LEARNED");
}

#[tokio::test]
async fn learned_words_lifecycle() {
    let (app, _db) = create_test_app().await;
    let token = register_user(&app, "dave").await;

    let first = send(
        &app,
        post_json("/api/learned-words", Some(&token), json!({ "word": "ephemeral" })),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let first_body = body_json(first).await;
    assert_eq!(first_body["data"]["alreadyLearned"], false);
    assert_eq!(first_body["data"]["word"], "ephemeral");

    let repeat = send(
        &app,
        post_json("/api/learned-words", Some(&token), json!({ "word": "ephemeral" })),
    )
    .await;
    assert_eq!(repeat.status(), StatusCode::OK);
    assert_eq!(body_json(repeat).await["data"]["alreadyLearned"], true);

    let empty = send(
        &app,
        post_json("/api/learned-words", Some(&token), json!({ "word": "   " })),
    )
    .await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(empty).await["code"], "VALIDATION_ERROR");

    let list = send(&app, get("/api/learned-words?page=1&pageSize=10", Some(&token))).await;
    assert_eq!(list.status(), StatusCode::OK);
    let list_body = body_json(list).await;
    assert_eq!(list_body["data"]["total"], 1);
    assert_eq!(list_body["data"]["items"][0]["word"], "ephemeral");

    let removed = send(&app, delete("/api/learned-words/ephemeral", Some(&token))).await;
    assert_eq!(removed.status(), StatusCode::OK);

    let removed_again = send(&app, delete("/api/learned-words/ephemeral", Some(&token))).await;
    assert_eq!(removed_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dictionary_lookup_serves_cached_entry() {
    let (app, db) = create_test_app().await;
    let token = register_user(&app, "erin").await;

    // Upstream is unreachable in tests, so an uncached word is a 404.
    let miss = send(&app, get("/api/words/zyzzyva", Some(&token))).await;
    assert_eq!(miss.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(miss).await["code"], "WORD_NOT_FOUND");

    vocab_backend::db::operations::dictionary::upsert(
        db.as_ref(),
        "abandon",
        &json!([{ "text": "/əˈbændən/" }]),
        &json!([{ "partOfSpeech": "verb" }]),
    )
    .await
    .unwrap();

    let hit = send(&app, get("/api/words/Abandon", Some(&token))).await;
    assert_eq!(hit.status(), StatusCode::OK);
    let body = body_json(hit).await;
    assert_eq!(body["data"]["word"], "abandon");
    assert_eq!(body["data"]["meanings"][0]["partOfSpeech"], "verb");
}

#[tokio::test]
async fn quiz_flow_serves_grades_and_counts() {
    let (app, db) = create_test_app().await;
    let token = register_user(&app, "frank").await;

    let empty = send(&app, get("/api/quiz/question", Some(&token))).await;
    assert_eq!(empty.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(empty).await["code"], "NO_QUESTIONS_LEFT");

    let q = quiz::insert_question(
        db.as_ref(),
        "cat",
        "a small domesticated feline",
        ["a large fish", "a type of tree", "a musical instrument"],
    )
    .await
    .unwrap();

    let served = send(&app, get("/api/quiz/question", Some(&token))).await;
    assert_eq!(served.status(), StatusCode::OK);
    let served_body = body_json(served).await;
    assert_eq!(served_body["data"]["word"], "cat");
    let choices = served_body["data"]["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 4);
    assert!(choices.contains(&json!("a small domesticated feline")));
    // The served payload never carries the answer key.
    assert!(served_body["data"].get("correctAnswer").is_none());

    let wrong = send(
        &app,
        post_json(
            "/api/quiz/answer",
            Some(&token),
            json!({ "questionId": q.id, "answer": "a large fish" }),
        ),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::OK);
    let wrong_body = body_json(wrong).await;
    assert_eq!(wrong_body["data"]["correct"], false);
    assert_eq!(wrong_body["data"]["alreadyCompleted"], false);
    assert_eq!(wrong_body["data"]["correctAnswer"], "a small domesticated feline");

    // A late correct submission reports the recorded first attempt.
    let retry = send(
        &app,
        post_json(
            "/api/quiz/answer",
            Some(&token),
            json!({ "questionId": q.id, "answer": "a small domesticated feline" }),
        ),
    )
    .await;
    let retry_body = body_json(retry).await;
    assert_eq!(retry_body["data"]["correct"], false);
    assert_eq!(retry_body["data"]["alreadyCompleted"], true);

    let stats = send(&app, get("/api/quiz/statistics", Some(&token))).await;
    let stats_body = body_json(stats).await;
    assert_eq!(stats_body["data"]["totalQuestions"], 1);
    assert_eq!(stats_body["data"]["completed"], 1);
    assert_eq!(stats_body["data"]["correct"], 0);
    assert_eq!(stats_body["data"]["accuracyRate"], 0.0);

    let missing = send(
        &app,
        post_json(
            "/api/quiz/answer",
            Some(&token),
            json!({ "questionId": "no-such-id", "answer": "whatever" }),
        ),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["code"], "QUESTION_NOT_FOUND");
}

#[tokio::test]
async fn correct_answers_listing_paginates() {
    let (app, db) = create_test_app().await;
    let token = register_user(&app, "grace").await;

    for i in 0..3 {
        let q = quiz::insert_question(
            db.as_ref(),
            &format!("word{i}"),
            &format!("answer{i}"),
            ["w1", "w2", "w3"],
        )
        .await
        .unwrap();
        let response = send(
            &app,
            post_json(
                "/api/quiz/answer",
                Some(&token),
                json!({ "questionId": q.id, "answer": format!("answer{i}") }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let page = send(
        &app,
        get("/api/quiz/correct-answers?page=1&pageSize=2", Some(&token)),
    )
    .await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = body_json(page).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["pageSize"], 2);
}
