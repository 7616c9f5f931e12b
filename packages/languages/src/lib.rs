// ABOUTME: Language management for Tutor
// ABOUTME: Per-user language rows with TTS voice tags and a single default

pub mod storage;
pub mod types;


pub use storage::LanguageStorage;
pub use types::{Language, LanguageInput, LanguageUpdate};
