//! Unit tests for the retention sweep

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::verification_attempt::{VerificationAttempt, VerificationChannel};
use crate::repositories::VerificationRepository;
use crate::services::verification::cleanup::{CleanupConfig, VerificationCleanupService};

use super::mocks::MockVerificationRepository;

fn attempt_expired_hours_ago(hours: i64) -> VerificationAttempt {
    let mut attempt = VerificationAttempt::new(
        "+966501234567",
        None,
        Some("123456".to_string()),
        VerificationChannel::LocalSms,
        10,
    );
    attempt.expires_at = Utc::now() - Duration::hours(hours);
    attempt
}

#[tokio::test]
async fn test_cleanup_deletes_only_past_retention() {
    let repository = Arc::new(MockVerificationRepository::new());
    repository.create(&attempt_expired_hours_ago(48)).await.unwrap();
    repository.create(&attempt_expired_hours_ago(1)).await.unwrap();
    repository
        .create(&VerificationAttempt::new("+966501234568", None, None, VerificationChannel::Provider, 10))
        .await
        .unwrap();

    let service = VerificationCleanupService::new(repository.clone(), CleanupConfig::default());
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.deleted, 1);
    assert!(result.cutoff.is_some());
    assert_eq!(repository.count(), 2);
}

#[tokio::test]
async fn test_disabled_cleanup_is_noop() {
    let repository = Arc::new(MockVerificationRepository::new());
    repository.create(&attempt_expired_hours_ago(48)).await.unwrap();

    let config = CleanupConfig {
        enabled: false,
        ..CleanupConfig::default()
    };
    let service = VerificationCleanupService::new(repository.clone(), config);
    let result = service.run_cleanup().await.unwrap();

    assert_eq!(result.deleted, 0);
    assert!(result.cutoff.is_none());
    assert_eq!(repository.count(), 1);
}

#[tokio::test]
async fn test_cleanup_propagates_store_errors() {
    let repository = Arc::new(MockVerificationRepository::failing());
    let service = VerificationCleanupService::new(repository, CleanupConfig::default());

    assert!(service.run_cleanup().await.is_err());
}

#[test]
fn test_config_from_verification_settings() {
    let settings = kh_shared::config::VerificationConfig {
        retention_hours: 6,
        cleanup_interval_secs: 0,
        ..Default::default()
    };
    let config = CleanupConfig::from(&settings);

    assert_eq!(config.retention_hours, 6);
    assert!(!config.enabled);
}
