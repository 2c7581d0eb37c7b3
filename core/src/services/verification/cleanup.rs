//! Retention sweep for verification attempts
//!
//! Attempts are only useful until they expire. This service deletes rows whose
//! `expires_at` is older than the retention window so the table does not grow
//! without bound.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use kh_shared::config::VerificationConfig;
use tracing::{error, info, warn};

use crate::errors::DomainError;
use crate::repositories::VerificationRepository;

/// Configuration for the retention sweep
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Grace period after expiry before deletion (in hours)
    pub retention_hours: i64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            retention_hours: 24,
            enabled: true,
        }
    }
}

impl From<&VerificationConfig> for CleanupConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_secs,
            retention_hours: config.retention_hours,
            enabled: config.cleanup_interval_secs > 0,
        }
    }
}

/// Service for deleting long-expired verification attempts
pub struct VerificationCleanupService<V: VerificationRepository + 'static> {
    repository: Arc<V>,
    config: CleanupConfig,
}

impl<V: VerificationRepository> VerificationCleanupService<V> {
    pub fn new(repository: Arc<V>, config: CleanupConfig) -> Self {
        Self { repository, config }
    }

    /// Run a single cleanup cycle relative to `now`
    pub async fn run_cleanup_at(&self, now: DateTime<Utc>) -> Result<CleanupResult, DomainError> {
        if !self.config.enabled {
            return Ok(CleanupResult::default());
        }

        let cutoff = now - Duration::hours(self.config.retention_hours);
        let deleted = self.repository.delete_expired_before(cutoff).await?;

        info!(
            event = "verification_cleanup",
            deleted = deleted,
            cutoff = %cutoff,
            "Deleted expired verification attempts"
        );

        Ok(CleanupResult { deleted, cutoff: Some(cutoff) })
    }

    /// Run a single cleanup cycle
    pub async fn run_cleanup(&self) -> Result<CleanupResult, DomainError> {
        self.run_cleanup_at(Utc::now()).await
    }

    /// Start the cleanup service as a background task
    ///
    /// This spawns a tokio task that runs cleanup at regular intervals
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Verification cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Verification cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.run_cleanup().await {
                    error!("Verification cleanup cycle failed: {}", e);
                }
            }
        });
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of attempts deleted
    pub deleted: u64,
    /// Expiry cutoff used, `None` when cleanup is disabled
    pub cutoff: Option<DateTime<Utc>>,
}
