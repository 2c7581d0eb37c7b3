//! MySQL implementation of the VerificationRepository trait.
//!
//! Attempts live in `phone_verification_codes`. UUIDs are stored as
//! CHAR(36) strings and the channel as its snake_case name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use kh_core::domain::entities::verification_attempt::{VerificationAttempt, VerificationChannel};
use kh_core::errors::DomainError;
use kh_core::repositories::VerificationRepository;

/// MySQL implementation of VerificationRepository
pub struct MySqlVerificationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlVerificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to VerificationAttempt entity
    fn row_to_attempt(row: &sqlx::mysql::MySqlRow) -> Result<VerificationAttempt, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get id: {}", e) })?;
        let user_id: Option<String> = row
            .try_get("user_id")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get user_id: {}", e) })?;
        let channel: String = row
            .try_get("channel")
            .map_err(|e| DomainError::Internal { message: format!("Failed to get channel: {}", e) })?;

        Ok(VerificationAttempt {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Internal { message: format!("Invalid attempt UUID: {}", e) })?,
            user_id: user_id
                .map(|u| Uuid::parse_str(&u))
                .transpose()
                .map_err(|e| DomainError::Internal { message: format!("Invalid user UUID: {}", e) })?,
            phone: row
                .try_get("phone")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get phone: {}", e) })?,
            code: row
                .try_get("code")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get code: {}", e) })?,
            channel: channel
                .parse::<VerificationChannel>()
                .map_err(|e| DomainError::Internal { message: e })?,
            attempts: row
                .try_get("attempts")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get attempts: {}", e) })?,
            verified: row
                .try_get("verified")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get verified: {}", e) })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get created_at: {}", e) })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Internal { message: format!("Failed to get expires_at: {}", e) })?,
        })
    }
}

#[async_trait]
impl VerificationRepository for MySqlVerificationRepository {
    async fn create(&self, attempt: &VerificationAttempt) -> Result<VerificationAttempt, DomainError> {
        let query = r#"
            INSERT INTO phone_verification_codes (
                id, user_id, phone, code, channel, attempts, verified, created_at, expires_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(attempt.id.to_string())
            .bind(attempt.user_id.map(|u| u.to_string()))
            .bind(&attempt.phone)
            .bind(&attempt.code)
            .bind(attempt.channel.as_str())
            .bind(attempt.attempts)
            .bind(attempt.verified)
            .bind(attempt.created_at)
            .bind(attempt.expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to save verification attempt: {}", e) })?;

        Ok(attempt.clone())
    }

    async fn find_latest_by_phone(&self, phone: &str) -> Result<Option<VerificationAttempt>, DomainError> {
        let query = r#"
            SELECT id, user_id, phone, code, channel, attempts, verified, created_at, expires_at
            FROM phone_verification_codes
            WHERE phone = ?
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to find verification attempt: {}", e) })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_attempt(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, attempt: &VerificationAttempt) -> Result<(), DomainError> {
        let query = r#"
            UPDATE phone_verification_codes
            SET code = ?, attempts = ?, verified = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&attempt.code)
            .bind(attempt.attempts)
            .bind(attempt.verified)
            .bind(attempt.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to update verification attempt: {}", e) })?;

        if result.rows_affected() == 0 {
            // MySQL reports 0 when the values were unchanged, so confirm the row exists
            let exists = sqlx::query("SELECT 1 FROM phone_verification_codes WHERE id = ?")
                .bind(attempt.id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Internal { message: format!("Failed to check verification attempt: {}", e) })?;
            if exists.is_none() {
                return Err(DomainError::NotFound {
                    resource: format!("verification attempt {}", attempt.id),
                });
            }
        }

        Ok(())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM phone_verification_codes WHERE expires_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal { message: format!("Failed to delete expired attempts: {}", e) })?;

        Ok(result.rows_affected())
    }
}
