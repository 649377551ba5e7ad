use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::db::operations::now_iso;
use crate::db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub word: String,
    pub correct_answer: String,
    pub wrong_answers: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedQuiz {
    pub id: String,
    pub user_id: String,
    pub quiz_question_id: String,
    pub was_correct: bool,
    pub completed_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectAnswerEntry {
    pub quiz_question_id: String,
    pub word: String,
    pub correct_answer: String,
    pub completed_at: String,
}

pub async fn insert_question(
    db: &Database,
    word: &str,
    correct_answer: &str,
    wrong_answers: [&str; 3],
) -> Result<QuizQuestion, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "quiz_questions"
            ("id", "word", "correctAnswer", "wrongAnswer1", "wrongAnswer2", "wrongAnswer3", "createdAt")
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&id)
    .bind(word)
    .bind(correct_answer)
    .bind(wrong_answers[0])
    .bind(wrong_answers[1])
    .bind(wrong_answers[2])
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(QuizQuestion {
        id,
        word: word.to_string(),
        correct_answer: correct_answer.to_string(),
        wrong_answers: wrong_answers.iter().map(|s| s.to_string()).collect(),
        created_at: now,
    })
}

pub async fn get_question_by_id(
    db: &Database,
    question_id: &str,
) -> Result<Option<QuizQuestion>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "quiz_questions" WHERE "id" = $1 LIMIT 1"#)
        .bind(question_id)
        .fetch_optional(db.pool())
        .await?;
    row.as_ref().map(map_question).transpose()
}

/// Questions the user has not yet completed, in no particular order.
pub async fn list_unanswered_for_user(
    db: &Database,
    user_id: &str,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "quiz_questions"
        WHERE "id" NOT IN (
            SELECT "quizQuestionId" FROM "completed_quizzes" WHERE "userId" = $1
        )
        "#,
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;
    rows.iter().map(map_question).collect()
}

pub async fn get_completed(
    db: &Database,
    user_id: &str,
    question_id: &str,
) -> Result<Option<CompletedQuiz>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT * FROM "completed_quizzes" WHERE "userId" = $1 AND "quizQuestionId" = $2 LIMIT 1"#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(db.pool())
    .await?;
    row.as_ref().map(map_completed).transpose()
}

pub async fn insert_completed(
    db: &Database,
    user_id: &str,
    question_id: &str,
    was_correct: bool,
) -> Result<CompletedQuiz, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "completed_quizzes" ("id", "userId", "quizQuestionId", "wasCorrect", "completedAt")
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(question_id)
    .bind(was_correct)
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(CompletedQuiz {
        id,
        user_id: user_id.to_string(),
        quiz_question_id: question_id.to_string(),
        was_correct,
        completed_at: now,
    })
}

pub async fn count_questions(db: &Database) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "quiz_questions""#)
        .fetch_one(db.pool())
        .await
}

pub async fn count_completed_for_user(db: &Database, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "completed_quizzes" WHERE "userId" = $1"#)
        .bind(user_id)
        .fetch_one(db.pool())
        .await
}

pub async fn count_correct_for_user(db: &Database, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM "completed_quizzes" WHERE "userId" = $1 AND "wasCorrect" = TRUE"#,
    )
    .bind(user_id)
    .fetch_one(db.pool())
    .await
}

pub async fn list_correct_for_user_paginated(
    db: &Database,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<CorrectAnswerEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT cq."quizQuestionId", q."word", q."correctAnswer", cq."completedAt"
        FROM "completed_quizzes" cq
        JOIN "quiz_questions" q ON q."id" = cq."quizQuestionId"
        WHERE cq."userId" = $1 AND cq."wasCorrect" = TRUE
        ORDER BY cq."completedAt" DESC, cq."id"
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db.pool())
    .await?;

    rows.iter()
        .map(|r| {
            Ok(CorrectAnswerEntry {
                quiz_question_id: r.try_get("quizQuestionId")?,
                word: r.try_get("word")?,
                correct_answer: r.try_get("correctAnswer")?,
                completed_at: r.try_get("completedAt")?,
            })
        })
        .collect()
}

fn map_question(row: &sqlx::sqlite::SqliteRow) -> Result<QuizQuestion, sqlx::Error> {
    Ok(QuizQuestion {
        id: row.try_get("id")?,
        word: row.try_get("word")?,
        correct_answer: row.try_get("correctAnswer")?,
        wrong_answers: vec![
            row.try_get("wrongAnswer1")?,
            row.try_get("wrongAnswer2")?,
            row.try_get("wrongAnswer3")?,
        ],
        created_at: row.try_get("createdAt")?,
    })
}

fn map_completed(row: &sqlx::sqlite::SqliteRow) -> Result<CompletedQuiz, sqlx::Error> {
    Ok(CompletedQuiz {
        id: row.try_get("id")?,
        user_id: row.try_get("userId")?,
        quiz_question_id: row.try_get("quizQuestionId")?,
        was_correct: row.try_get("wasCorrect")?,
        completed_at: row.try_get("completedAt")?,
    })
}
