// ABOUTME: User settings for Tutor
// ABOUTME: One row per user picking the default language and active provider

pub mod storage;
pub mod types;


pub use storage::SettingsStorage;
pub use types::{LanguageRef, ProviderRef, PublicConfig, SettingsInput, UserSettings};
