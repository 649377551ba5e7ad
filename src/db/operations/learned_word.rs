use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::db::operations::now_iso;
use crate::db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedWord {
    pub id: String,
    pub user_id: String,
    pub word: String,
    pub learned_at: String,
}

pub async fn insert(db: &Database, user_id: &str, word: &str) -> Result<LearnedWord, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "learned_words" ("id", "userId", "word", "learnedAt")
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(word)
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(LearnedWord {
        id,
        user_id: user_id.to_string(),
        word: word.to_string(),
        learned_at: now,
    })
}

pub async fn get_by_user_and_word(
    db: &Database,
    user_id: &str,
    word: &str,
) -> Result<Option<LearnedWord>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT * FROM "learned_words" WHERE "userId" = $1 AND "word" = $2 LIMIT 1"#,
    )
    .bind(user_id)
    .bind(word)
    .fetch_optional(db.pool())
    .await?;
    row.as_ref().map(map_learned_word).transpose()
}

/// Full learned-word list for a user, used to build the in-memory cache
/// and the selector's exclusion set.
pub async fn list_words_for_user(db: &Database, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT "word" FROM "learned_words" WHERE "userId" = $1"#)
        .bind(user_id)
        .fetch_all(db.pool())
        .await
}

pub async fn list_for_user_paginated(
    db: &Database,
    user_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<LearnedWord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "learned_words"
        WHERE "userId" = $1
        ORDER BY "learnedAt" DESC, "id"
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db.pool())
    .await?;
    rows.iter().map(map_learned_word).collect()
}

pub async fn count_for_user(db: &Database, user_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM "learned_words" WHERE "userId" = $1"#)
        .bind(user_id)
        .fetch_one(db.pool())
        .await
}

/// Returns true when a row was deleted.
pub async fn delete(db: &Database, user_id: &str, word: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "learned_words" WHERE "userId" = $1 AND "word" = $2"#)
        .bind(user_id)
        .bind(word)
        .execute(db.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_learned_word(row: &sqlx::sqlite::SqliteRow) -> Result<LearnedWord, sqlx::Error> {
    Ok(LearnedWord {
        id: row.try_get("id")?,
        user_id: row.try_get("userId")?,
        word: row.try_get("word")?,
        learned_at: row.try_get("learnedAt")?,
    })
}
