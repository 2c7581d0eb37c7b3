//! Integration tests for the in-memory repositories

use chrono::{Duration, Utc};
use uuid::Uuid;

use kh_core::domain::entities::{UserProfile, VerificationAttempt, VerificationChannel};
use kh_core::errors::DomainError;
use kh_core::repositories::{ProfileRepository, VerificationRepository};
use kh_infra::memory::{InMemoryProfileRepository, InMemoryVerificationRepository};

fn attempt(phone: &str) -> VerificationAttempt {
    VerificationAttempt::new(phone, None, Some("123456".to_string()), VerificationChannel::LocalSms, 10)
}

#[tokio::test]
async fn test_latest_attempt_wins() {
    let repo = InMemoryVerificationRepository::new();

    let mut older = attempt("+966501234567");
    older.created_at = Utc::now() - Duration::minutes(5);
    repo.create(&older).await.unwrap();
    let newer = repo.create(&attempt("+966501234567")).await.unwrap();
    repo.create(&attempt("+966509999999")).await.unwrap();

    let latest = repo.find_latest_by_phone("+966501234567").await.unwrap().unwrap();
    assert_eq!(latest.id, newer.id);
    assert!(repo.find_latest_by_phone("+14155552671").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_persists_mutable_fields() {
    let repo = InMemoryVerificationRepository::new();
    let mut stored = repo.create(&attempt("+966501234567")).await.unwrap();

    stored.increment_attempts();
    stored.mark_verified("123456");
    repo.update(&stored).await.unwrap();

    let reloaded = repo.find_latest_by_phone("+966501234567").await.unwrap().unwrap();
    assert_eq!(reloaded.attempts, 1);
    assert!(reloaded.verified);
}

#[tokio::test]
async fn test_update_unknown_attempt_fails() {
    let repo = InMemoryVerificationRepository::new();

    let result = repo.update(&attempt("+966501234567")).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete_expired_before() {
    let repo = InMemoryVerificationRepository::new();
    let mut stale = attempt("+966501234567");
    stale.expires_at = Utc::now() - Duration::hours(30);
    repo.create(&stale).await.unwrap();
    repo.create(&attempt("+966501234568")).await.unwrap();

    let deleted = repo
        .delete_expired_before(Utc::now() - Duration::hours(24))
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_profile_updates() {
    let repo = InMemoryProfileRepository::new();
    let first = UserProfile::new(Uuid::new_v4()).with_phone("+966501234567");
    let second = UserProfile::new(Uuid::new_v4()).with_phone("+966501234567");
    let other = UserProfile::new(Uuid::new_v4()).with_phone("+966509999999");
    for profile in [&first, &second, &other] {
        repo.save(profile).await.unwrap();
    }

    let updated = repo.mark_verified_by_phone("+966501234567").await.unwrap();

    assert_eq!(updated, 2);
    assert!(repo.find_by_id(first.id).await.unwrap().unwrap().phone_verified);
    assert!(repo.find_by_id(second.id).await.unwrap().unwrap().phone_verified);
    assert!(!repo.find_by_id(other.id).await.unwrap().unwrap().phone_verified);
}

#[tokio::test]
async fn test_mark_verified_for_user_creates_profile() {
    let repo = InMemoryProfileRepository::new();
    let user_id = Uuid::new_v4();

    repo.mark_verified_for_user(user_id, "+966501234567").await.unwrap();

    let profile = repo.find_by_id(user_id).await.unwrap().unwrap();
    assert!(profile.phone_verified);
    assert_eq!(profile.phone.as_deref(), Some("+966501234567"));
}
