use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::db::operations::now_iso;
use crate::db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    pub id: String,
    pub word: String,
    pub meaning: Option<String>,
    pub translation: Option<String>,
    pub created_at: String,
}

pub async fn insert_vocabulary(
    db: &Database,
    word: &str,
    meaning: Option<&str>,
    translation: Option<&str>,
) -> Result<Vocabulary, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "vocabularies" ("id", "word", "meaning", "translation", "createdAt")
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&id)
    .bind(word)
    .bind(meaning)
    .bind(translation)
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(Vocabulary {
        id,
        word: word.to_string(),
        meaning: meaning.map(String::from),
        translation: translation.map(String::from),
        created_at: now,
    })
}

pub async fn list_all(db: &Database) -> Result<Vec<Vocabulary>, sqlx::Error> {
    let rows = sqlx::query(r#"SELECT * FROM "vocabularies" ORDER BY "word""#)
        .fetch_all(db.pool())
        .await?;
    rows.iter().map(map_vocabulary).collect()
}

fn map_vocabulary(row: &sqlx::sqlite::SqliteRow) -> Result<Vocabulary, sqlx::Error> {
    Ok(Vocabulary {
        id: row.try_get("id")?,
        word: row.try_get("word")?,
        meaning: row.try_get("meaning")?,
        translation: row.try_get("translation")?,
        created_at: row.try_get("createdAt")?,
    })
}
