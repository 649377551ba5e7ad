pub mod operations;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");
const SCHEMA_VERSION: &str = "1";

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn from_env() -> Result<Arc<Self>, DbInitError> {
        let url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                let path = default_db_path();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| DbInitError::Io(e.to_string()))?;
                }
                format!("sqlite:{}?mode=rwc", path.display())
            }
        };

        Ok(Arc::new(Self::connect(&url).await?))
    }

    pub async fn connect(url: &str) -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbInitError::Config(e.to_string()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        // In-memory databases exist per-connection; keep exactly one alive.
        let in_memory = url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .min_connections(u32::from(in_memory))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    async fn run_migrations(&self) -> Result<(), DbInitError> {
        let version: Option<String> = sqlx::query_scalar(
            r#"SELECT "value" FROM "_db_metadata" WHERE "key" = 'schema_version'"#,
        )
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None);

        if version.is_some() {
            return Ok(());
        }

        for stmt in split_sql_statements(SCHEMA_SQL) {
            let sql: String = stmt
                .lines()
                .filter(|line| !line.trim().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n");
            let trimmed = sql.trim();
            if trimmed.is_empty() {
                continue;
            }
            sqlx::query(trimmed).execute(&self.pool).await?;
        }

        sqlx::query(
            r#"INSERT OR REPLACE INTO "_db_metadata" ("key", "value") VALUES ('schema_version', $1)"#,
        )
        .bind(SCHEMA_VERSION)
        .execute(&self.pool)
        .await?;

        tracing::info!("database schema initialized");
        Ok(())
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-backend")
        .join("data.db")
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;

    for ch in sql.chars() {
        match ch {
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            ';' if !in_single_quote && !in_double_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
