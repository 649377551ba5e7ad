pub mod dictionary;
pub mod learned_word;
pub mod quiz;
pub mod user;
pub mod vocabulary;

use chrono::{SecondsFormat, Utc};

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
