pub mod dictionary;
pub mod learned_words;
pub mod quiz;
pub mod word_selection;
