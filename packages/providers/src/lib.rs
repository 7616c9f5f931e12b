// ABOUTME: AI provider registry for Tutor
// ABOUTME: Per-user provider rows; credentials are write-only and encrypted at rest

pub mod storage;
pub mod types;


pub use storage::ProviderStorage;
pub use types::{
    AiProvider, MaskedProvider, ProviderImportRow, ProviderInput, ProviderKind,
    ProviderUpdate, CREDENTIAL_SENTINEL,
};
