use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use kh_core::domain::entities::profile::UserProfile;
use kh_core::errors::DomainError;
use kh_core::repositories::ProfileRepository;

/// Profiles keyed by user id
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<Uuid, UserProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.profiles.read().await.get(&id).cloned())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), DomainError> {
        self.profiles
            .write()
            .await
            .insert(profile.id, profile.clone());
        Ok(())
    }

    async fn mark_verified_for_user(&self, user_id: Uuid, phone: &str) -> Result<(), DomainError> {
        self.profiles
            .write()
            .await
            .entry(user_id)
            .or_insert_with(|| UserProfile::new(user_id))
            .mark_phone_verified(phone);
        Ok(())
    }

    async fn mark_verified_by_phone(&self, phone: &str) -> Result<u64, DomainError> {
        let mut updated = 0;
        for profile in self.profiles.write().await.values_mut() {
            if profile.phone.as_deref() == Some(phone) {
                profile.mark_phone_verified(phone);
                updated += 1;
            }
        }
        Ok(updated)
    }
}
