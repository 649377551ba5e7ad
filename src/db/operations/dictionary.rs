use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::db::operations::now_iso;
use crate::db::Database;

/// Locally cached dictionary definition. Phonetics and meanings keep the
/// upstream JSON shape, serialized as text columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub id: String,
    pub word: String,
    pub phonetics: serde_json::Value,
    pub meanings: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

pub async fn get_by_word(db: &Database, word: &str) -> Result<Option<DictionaryEntry>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "dictionary_entries" WHERE "word" = $1 LIMIT 1"#)
        .bind(word)
        .fetch_optional(db.pool())
        .await?;
    row.as_ref().map(map_entry).transpose()
}

pub async fn upsert(
    db: &Database,
    word: &str,
    phonetics: &serde_json::Value,
    meanings: &serde_json::Value,
) -> Result<DictionaryEntry, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    let phonetics_text = phonetics.to_string();
    let meanings_text = meanings.to_string();

    sqlx::query(
        r#"
        INSERT INTO "dictionary_entries" ("id", "word", "phonetics", "meanings", "createdAt", "updatedAt")
        VALUES ($1, $2, $3, $4, $5, $5)
        ON CONFLICT ("word") DO UPDATE SET
            "phonetics" = EXCLUDED."phonetics",
            "meanings" = EXCLUDED."meanings",
            "updatedAt" = EXCLUDED."updatedAt"
        "#,
    )
    .bind(&id)
    .bind(word)
    .bind(&phonetics_text)
    .bind(&meanings_text)
    .bind(&now)
    .execute(db.pool())
    .await?;

    // Re-read so the caller sees the surviving row on conflict.
    get_by_word(db, word).await.map(|entry| {
        entry.unwrap_or(DictionaryEntry {
            id,
            word: word.to_string(),
            phonetics: phonetics.clone(),
            meanings: meanings.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    })
}

fn map_entry(row: &sqlx::sqlite::SqliteRow) -> Result<DictionaryEntry, sqlx::Error> {
    let phonetics_text: String = row.try_get("phonetics")?;
    let meanings_text: String = row.try_get("meanings")?;
    Ok(DictionaryEntry {
        id: row.try_get("id")?,
        word: row.try_get("word")?,
        phonetics: serde_json::from_str(&phonetics_text)
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        meanings: serde_json::from_str(&meanings_text)
            .unwrap_or(serde_json::Value::Array(Vec::new())),
        created_at: row.try_get("createdAt")?,
        updated_at: row.try_get("updatedAt")?,
    })
}
