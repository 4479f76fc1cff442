#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use hubshift_core::errors::HubError;
use hubshift_core::model::{
    Application, ApplicationUpdate, AuthProvider, Conversation, NewShift, ProfessionalProfile,
    Role, Session, Shift, ShiftStatus, Strike, User, VenueProfile,
};
use hubshift_engine::commands::shifts::create_shift;
use hubshift_engine::{IdentityVerifier, VerifiedIdentity};
use hubshift_store::errors::Result as StoreResult;
use hubshift_store::{MemoryRepo, Repository};
use uuid::Uuid;
use std::collections::HashMap;

/// Verifier that accepts a fixed set of credentials
#[derive(Default)]
pub struct StubVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StubVerifier {
    pub fn with(mut self, credential: &str, subject: &str, email: &str) -> Self {
        self.identities.insert(
            credential.to_string(),
            VerifiedIdentity {
                subject: subject.to_string(),
                email: email.to_string(),
                name: Some("Test User".to_string()),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, HubError> {
        self.identities
            .get(credential)
            .cloned()
            .ok_or_else(|| HubError::IdentityRejected {
                reason: "unknown test credential".to_string(),
            })
    }
}

pub fn ttl() -> Duration {
    Duration::hours(1)
}

pub async fn user(repo: &MemoryRepo, email: &str, role: Option<Role>) -> User {
    let mut user = User::new(email, AuthProvider::Email);
    if let Some(role) = role {
        user.select_role(role);
    }
    repo.insert_user(&user).await.unwrap();
    user
}

pub fn days_from_now(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

pub fn new_shift(requires_rsa: bool) -> NewShift {
    NewShift {
        title: "Bartender".to_string(),
        date: days_from_now(10),
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        hourly_rate_cents: 3800,
        requires_rsa,
    }
}

pub async fn posted_shift(repo: &MemoryRepo, hub: &User, requires_rsa: bool) -> Shift {
    create_shift(repo, hub, new_shift(requires_rsa)).await.unwrap()
}

/// `MemoryRepo` that yields to the scheduler before every call, so commands
/// joined on one task interleave between their repository steps
#[derive(Default)]
pub struct YieldingRepo {
    pub inner: MemoryRepo,
}

#[async_trait]
impl Repository for YieldingRepo {
    async fn ping(&self) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.ping().await
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_user(user).await
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_user(user).await
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.inner.find_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.inner.find_user_by_email(email).await
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> StoreResult<Option<User>> {
        tokio::task::yield_now().await;
        self.inner.find_user_by_google_id(google_id).await
    }

    async fn insert_session(&self, session: &Session) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_session(session).await
    }

    async fn find_session(&self, token_hash: &str) -> StoreResult<Option<Session>> {
        tokio::task::yield_now().await;
        self.inner.find_session(token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.delete_session(token_hash).await
    }

    async fn find_venue_profile(&self, user_id: Uuid) -> StoreResult<Option<VenueProfile>> {
        tokio::task::yield_now().await;
        self.inner.find_venue_profile(user_id).await
    }

    async fn upsert_venue_profile(&self, profile: &VenueProfile) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.upsert_venue_profile(profile).await
    }

    async fn find_professional_profile(
        &self,
        user_id: Uuid,
    ) -> StoreResult<Option<ProfessionalProfile>> {
        tokio::task::yield_now().await;
        self.inner.find_professional_profile(user_id).await
    }

    async fn upsert_professional_profile(&self, profile: &ProfessionalProfile) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.upsert_professional_profile(profile).await
    }

    async fn record_strike(&self, strike: &Strike) -> StoreResult<Option<u32>> {
        tokio::task::yield_now().await;
        self.inner.record_strike(strike).await
    }

    async fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_shift(shift).await
    }

    async fn find_shift(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        tokio::task::yield_now().await;
        self.inner.find_shift(id).await
    }

    async fn update_shift_status(&self, id: Uuid, status: ShiftStatus) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_shift_status(id, status).await
    }

    async fn list_shifts_for_hub(
        &self,
        hub_id: Uuid,
        date: Option<NaiveDate>,
    ) -> StoreResult<Vec<Shift>> {
        tokio::task::yield_now().await;
        self.inner.list_shifts_for_hub(hub_id, date).await
    }

    async fn insert_application(&self, application: &Application) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_application(application).await
    }

    async fn update_application(&self, application: &Application) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.update_application(application).await
    }

    async fn accept_application(&self, application: &Application) -> StoreResult<bool> {
        tokio::task::yield_now().await;
        self.inner.accept_application(application).await
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        tokio::task::yield_now().await;
        self.inner.find_application(id).await
    }

    async fn find_application_for(
        &self,
        shift_id: Uuid,
        professional_id: Uuid,
    ) -> StoreResult<Option<Application>> {
        tokio::task::yield_now().await;
        self.inner
            .find_application_for(shift_id, professional_id)
            .await
    }

    async fn insert_application_update(&self, update: &ApplicationUpdate) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_application_update(update).await
    }

    async fn list_application_updates(
        &self,
        application_id: Uuid,
    ) -> StoreResult<Vec<ApplicationUpdate>> {
        tokio::task::yield_now().await;
        self.inner.list_application_updates(application_id).await
    }

    async fn find_conversation(
        &self,
        participant_a: Uuid,
        participant_b: Uuid,
        shift_id: Option<Uuid>,
    ) -> StoreResult<Option<Conversation>> {
        tokio::task::yield_now().await;
        self.inner
            .find_conversation(participant_a, participant_b, shift_id)
            .await
    }

    async fn insert_conversation(&self, conversation: &Conversation) -> StoreResult<()> {
        tokio::task::yield_now().await;
        self.inner.insert_conversation(conversation).await
    }
}
