use std::time::Duration;

use serde::Deserialize;

use crate::db::operations::dictionary::{self, DictionaryEntry};
use crate::db::Database;

/// Resolves word definitions against an external dictionary API, preferring a
/// local cache row. One upstream attempt per request, no retries; callers may
/// retry by repeating the request.
pub struct DictionaryService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamEntry {
    #[serde(default)]
    phonetics: serde_json::Value,
    #[serde(default)]
    meanings: serde_json::Value,
}

impl DictionaryService {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Cache row wins; otherwise a single upstream call. Upstream failure of
    /// any kind (status, network, timeout, empty or undecodable body) is
    /// logged and reported as `None` without caching a negative result.
    pub async fn lookup(
        &self,
        db: &Database,
        word: &str,
    ) -> Result<Option<DictionaryEntry>, sqlx::Error> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Ok(None);
        }

        if let Some(cached) = dictionary::get_by_word(db, &word).await? {
            return Ok(Some(cached));
        }

        let Some(upstream) = self.fetch_upstream(&word).await else {
            return Ok(None);
        };

        let entry = dictionary::upsert(db, &word, &upstream.phonetics, &upstream.meanings).await?;
        Ok(Some(entry))
    }

    async fn fetch_upstream(&self, word: &str) -> Option<UpstreamEntry> {
        let url = format!("{}/{}", self.base_url, word);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, word, "dictionary API request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), word, "dictionary API non-success status");
            return None;
        }

        let entries: Vec<UpstreamEntry> = match response.json().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(error = %err, word, "dictionary API body decode failed");
                return None;
            }
        };

        if entries.is_empty() {
            tracing::warn!(word, "dictionary API returned no entries");
            return None;
        }

        entries.into_iter().next()
    }
}
