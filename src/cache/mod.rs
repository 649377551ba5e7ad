use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::db::operations::learned_word;
use crate::db::Database;

pub const LEARNED_WORDS_TTL: Duration = Duration::from_secs(15 * 60);

struct CacheEntry {
    words: HashSet<String>,
    filled_at: Instant,
}

/// Per-user set of learned words, membership-tested case-insensitively.
/// Entries expire 15 minutes after fill; every mutation path must call
/// `invalidate` for the affected user before returning.
pub struct LearnedWordCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl LearnedWordCache {
    pub fn new() -> Self {
        Self::with_ttl(LEARNED_WORDS_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Never errors: a repository failure during fill is logged and answered
    /// as "not learned".
    pub async fn is_learned(&self, db: &Database, user_id: &str, word: &str) -> bool {
        let needle = normalize(word);

        {
            let entries = self.entries.lock().await;
            if let Some(entry) = entries.get(user_id) {
                if entry.filled_at.elapsed() < self.ttl {
                    return entry.words.contains(&needle);
                }
            }
        }

        let words = match learned_word::list_words_for_user(db, user_id).await {
            Ok(words) => words,
            Err(err) => {
                tracing::warn!(error = %err, user_id, "learned word cache fill failed");
                return false;
            }
        };

        let set: HashSet<String> = words.iter().map(|w| normalize(w)).collect();
        let learned = set.contains(&needle);

        let mut entries = self.entries.lock().await;
        entries.insert(
            user_id.to_string(),
            CacheEntry {
                words: set,
                filled_at: Instant::now(),
            },
        );

        learned
    }

    pub async fn invalidate(&self, user_id: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(user_id);
    }
}

impl Default for LearnedWordCache {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
