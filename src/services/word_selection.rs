use std::collections::HashSet;

use rand::Rng;

use crate::db::operations::{learned_word, vocabulary};
use crate::db::Database;

/// Outcome of a random-word request. Both empty cases yield no word but are
/// distinct conditions the API reports with different codes.
#[derive(Debug, Clone)]
pub enum WordSelection {
    Word(vocabulary::Vocabulary),
    AllLearned,
    NoVocabulary,
}

/// Picks one vocabulary word the user has not learned yet, uniformly at
/// random. Pure read, no side effects.
pub async fn random_unlearned_word(
    db: &Database,
    user_id: &str,
) -> Result<WordSelection, sqlx::Error> {
    let all = vocabulary::list_all(db).await?;
    if all.is_empty() {
        return Ok(WordSelection::NoVocabulary);
    }

    let learned: HashSet<String> = learned_word::list_words_for_user(db, user_id)
        .await?
        .iter()
        .map(|w| w.trim().to_lowercase())
        .collect();

    let candidates: Vec<vocabulary::Vocabulary> = all
        .into_iter()
        .filter(|v| !learned.contains(&v.word.trim().to_lowercase()))
        .collect();

    if candidates.is_empty() {
        return Ok(WordSelection::AllLearned);
    }

    let index = rand::rng().random_range(0..candidates.len());
    Ok(WordSelection::Word(candidates[index].clone()))
}
