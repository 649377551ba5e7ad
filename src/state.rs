use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::cache::LearnedWordCache;
use crate::config::Config;
use crate::db::Database;
use crate::services::dictionary::DictionaryService;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    config: Arc<Config>,
    db: Option<Arc<Database>>,
    learned_cache: Arc<LearnedWordCache>,
    dictionary: Arc<DictionaryService>,
}

impl AppState {
    pub fn new(config: Config, db: Option<Arc<Database>>) -> Self {
        let dictionary = Arc::new(DictionaryService::new(
            &config.dictionary_api_url,
            config.dictionary_timeout,
        ));

        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            config: Arc::new(config),
            db,
            learned_cache: Arc::new(LearnedWordCache::new()),
            dictionary,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn db(&self) -> Option<Arc<Database>> {
        self.db.clone()
    }

    pub fn learned_cache(&self) -> Arc<LearnedWordCache> {
        Arc::clone(&self.learned_cache)
    }

    pub fn dictionary(&self) -> Arc<DictionaryService> {
        Arc::clone(&self.dictionary)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }
}
