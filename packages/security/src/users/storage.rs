// ABOUTME: User storage layer using SQLite
// ABOUTME: Account creation and lookup

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::User;
use tutor_core::generate_row_id;
use tutor_storage::StorageError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, email: &str, name: &str) -> Result<User, StorageError> {
        debug!("Creating user: {}", email);

        let id = generate_row_id();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get(&id).await?.ok_or(StorageError::NotFound)
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.map(|row| self.row_to_user(&row)).transpose()
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = tutor_storage::connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        let user = storage.create("admin@example.com", "Admin").await.unwrap();
        let fetched = storage.get(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "admin@example.com");

        let by_email = storage.get_by_email("admin@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let pool = tutor_storage::connect_in_memory().await.unwrap();
        let storage = UserStorage::new(pool);

        storage.create("a@example.com", "A").await.unwrap();
        assert!(storage.create("a@example.com", "B").await.is_err());
    }
}
