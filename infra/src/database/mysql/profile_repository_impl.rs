//! MySQL implementation of the ProfileRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use kh_core::domain::entities::profile::UserProfile;
use kh_core::errors::DomainError;
use kh_core::repositories::ProfileRepository;

/// MySQL implementation of ProfileRepository
pub struct MySqlProfileRepository {
    pool: MySqlPool,
}

impl MySqlProfileRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_profile(row: &sqlx::mysql::MySqlRow) -> Result<UserProfile, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;

        Ok(UserProfile {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid profile UUID: {}", e) })?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get phone: {}", e) })?,
            phone_verified: row
                .try_get("phone_verified")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get phone_verified: {}", e) })?,
            name: row
                .try_get("name")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get name: {}", e) })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get created_at: {}", e) })?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get updated_at: {}", e) })?,
        })
    }
}

#[async_trait]
impl ProfileRepository for MySqlProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DomainError> {
        let query = r#"
            SELECT id, phone, phone_verified, name, created_at, updated_at
            FROM profiles
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find profile: {}", e) })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_profile(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO profiles (id, phone, phone_verified, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                phone = VALUES(phone),
                phone_verified = VALUES(phone_verified),
                name = VALUES(name),
                updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(profile.id.to_string())
            .bind(&profile.phone)
            .bind(profile.phone_verified)
            .bind(&profile.name)
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to save profile: {}", e) })?;

        Ok(())
    }

    async fn mark_verified_for_user(&self, user_id: Uuid, phone: &str) -> Result<(), DomainError> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO profiles (id, phone, phone_verified, created_at, updated_at)
            VALUES (?, ?, TRUE, ?, ?)
            ON DUPLICATE KEY UPDATE
                phone = VALUES(phone),
                phone_verified = TRUE,
                updated_at = VALUES(updated_at)
        "#;

        sqlx::query(query)
            .bind(user_id.to_string())
            .bind(phone)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to mark profile verified: {}", e) })?;

        Ok(())
    }

    async fn mark_verified_by_phone(&self, phone: &str) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE profiles SET phone_verified = TRUE, updated_at = ? WHERE phone = ?",
        )
        .bind(Utc::now())
        .bind(phone)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Internal { message: format!("Failed to mark profiles verified: {}", e) })?;

        Ok(result.rows_affected())
    }
}
