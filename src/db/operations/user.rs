use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use uuid::Uuid;

use crate::db::operations::now_iso;
use crate::db::Database;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub expires_at: String,
}

pub async fn create_user(
    db: &Database,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    sqlx::query(
        r#"
        INSERT INTO "users" ("id", "username", "passwordHash", "role", "createdAt", "updatedAt")
        VALUES ($1, $2, $3, 'USER', $4, $4)
        "#,
    )
    .bind(&id)
    .bind(username)
    .bind(password_hash)
    .bind(&now)
    .execute(db.pool())
    .await?;

    Ok(User {
        id,
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        role: "USER".to_string(),
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn get_user_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "username" = $1 LIMIT 1"#)
        .bind(username)
        .fetch_optional(db.pool())
        .await?;
    row.map(|r| map_user(&r)).transpose()
}

pub async fn get_user_by_id(db: &Database, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "id" = $1 LIMIT 1"#)
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?;
    row.map(|r| map_user(&r)).transpose()
}

pub async fn create_session(
    db: &Database,
    user_id: &str,
    token_hash: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO "sessions" ("id", "userId", "token", "expiresAt", "createdAt")
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at.to_rfc3339_opts(SecondsFormat::Millis, true))
    .bind(now_iso())
    .execute(db.pool())
    .await?;
    Ok(())
}

pub async fn get_session_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<Option<Session>, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT "id", "userId", "expiresAt" FROM "sessions" WHERE "token" = $1 LIMIT 1"#,
    )
    .bind(token_hash)
    .fetch_optional(db.pool())
    .await?;

    row.map(|r| {
        Ok(Session {
            id: r.try_get("id")?,
            user_id: r.try_get("userId")?,
            expires_at: r.try_get("expiresAt")?,
        })
    })
    .transpose()
}

pub async fn delete_session_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM "sessions" WHERE "token" = $1"#)
        .bind(token_hash)
        .execute(db.pool())
        .await?;
    Ok(())
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("passwordHash")?,
        role: row.try_get("role")?,
        created_at: row.try_get("createdAt")?,
        updated_at: row.try_get("updatedAt")?,
    })
}
