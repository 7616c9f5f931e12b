// ABOUTME: Database connection management and application state
// ABOUTME: Provides shared access to the SQLite pool and storage layers

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use tutor_ai::InstructionService;
use tutor_languages::LanguageStorage;
use tutor_providers::ProviderStorage;
use tutor_security::{TokenStorage, UserStorage};
use tutor_settings::SettingsStorage;
use tutor_storage::StorageError;

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub user_storage: Arc<UserStorage>,
    pub token_storage: Arc<TokenStorage>,
    pub language_storage: Arc<LanguageStorage>,
    pub provider_storage: Arc<ProviderStorage>,
    pub settings_storage: Arc<SettingsStorage>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Result<Self, StorageError> {
        let user_storage = Arc::new(UserStorage::new(pool.clone()));
        let token_storage = Arc::new(TokenStorage::new(pool.clone()));
        let language_storage = Arc::new(LanguageStorage::new(pool.clone()));
        let provider_storage = Arc::new(ProviderStorage::new(pool.clone())?);
        let settings_storage = Arc::new(SettingsStorage::new(pool.clone()));

        Ok(Self {
            pool,
            user_storage,
            token_storage,
            language_storage,
            provider_storage,
            settings_storage,
        })
    }

    /// Initialize database state with default configuration
    pub async fn init() -> Result<Self, StorageError> {
        Self::init_with_path(None).await
    }

    /// Initialize database state with optional custom database path
    pub async fn init_with_path(database_path: Option<PathBuf>) -> Result<Self, StorageError> {
        let database_path =
            database_path.unwrap_or_else(tutor_core::constants::database_file);

        let pool = tutor_storage::connect(&database_path).await?;
        Self::new(pool)
    }
}

/// Full application state: storages plus the instruction generator.
/// The generator owns the one outbound HTTP client, constructed at
/// startup and carried in state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbState,
    pub instructions: Arc<InstructionService>,
}

impl AppState {
    pub fn new(db: DbState) -> Self {
        Self {
            db,
            instructions: Arc::new(InstructionService::new()),
        }
    }
}

impl FromRef<AppState> for DbState {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
