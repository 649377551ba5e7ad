use crate::cache::LearnedWordCache;
use crate::db::operations::learned_word::{self, LearnedWord};
use crate::db::Database;

#[derive(Debug)]
pub enum MarkOutcome {
    Learned(LearnedWord),
    AlreadyLearned(LearnedWord),
    EmptyWord,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotLearned,
}

/// Idempotently records that the user has learned `word`. Words are stored
/// lowercased so the store's unique pair matches the cache's case-insensitive
/// membership. A concurrent duplicate insert surfaces as a unique violation
/// and is mapped back to the already-learned outcome; the store constraint is
/// the source of truth.
pub async fn mark_learned(
    db: &Database,
    cache: &LearnedWordCache,
    user_id: &str,
    word: &str,
) -> Result<MarkOutcome, sqlx::Error> {
    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return Ok(MarkOutcome::EmptyWord);
    }
    let word = word.as_str();

    // The cache answers the is-learned question; the exact row is only
    // fetched when it says yes.
    if cache.is_learned(db, user_id, word).await {
        if let Some(existing) = learned_word::get_by_user_and_word(db, user_id, word).await? {
            return Ok(MarkOutcome::AlreadyLearned(existing));
        }
    }

    match learned_word::insert(db, user_id, word).await {
        Ok(record) => {
            cache.invalidate(user_id).await;
            Ok(MarkOutcome::Learned(record))
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            // Lost the race to another writer; the row exists now.
            let existing = learned_word::get_by_user_and_word(db, user_id, word)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
            Ok(MarkOutcome::AlreadyLearned(existing))
        }
        Err(err) => Err(err),
    }
}

pub async fn remove_learned(
    db: &Database,
    cache: &LearnedWordCache,
    user_id: &str,
    word: &str,
) -> Result<RemoveOutcome, sqlx::Error> {
    let removed = learned_word::delete(db, user_id, &word.trim().to_lowercase()).await?;
    if removed {
        cache.invalidate(user_id).await;
        Ok(RemoveOutcome::Removed)
    } else {
        Ok(RemoveOutcome::NotLearned)
    }
}

pub async fn list_learned(
    db: &Database,
    user_id: &str,
    page: i64,
    page_size: i64,
) -> Result<(Vec<LearnedWord>, i64), sqlx::Error> {
    let page = page.max(1);
    let page_size = page_size.clamp(1, 100);
    let offset = (page - 1) * page_size;

    let items = learned_word::list_for_user_paginated(db, user_id, page_size, offset).await?;
    let total = learned_word::count_for_user(db, user_id).await?;
    Ok((items, total))
}
