//! Repository layer for persisting marketplace models
//!
//! `Repository` is the seam between command handlers and storage. `PgRepo`
//! backs it with Postgres; `MemoryRepo` keeps everything in process for
//! tests and local runs without a database.

pub mod memory_repo;
pub mod pg_repo;
mod rows;

use async_trait::async_trait;
use chrono::NaiveDate;
use hubshift_core::model::{
    Application, ApplicationUpdate, Conversation, ProfessionalProfile, Session, Shift,
    ShiftStatus, Strike, User, VenueProfile,
};
use uuid::Uuid;

use crate::errors::Result;

pub use memory_repo::MemoryRepo;
pub use pg_repo::PgRepo;

#[async_trait]
pub trait Repository: Send + Sync {
    /// Cheap liveness probe for health checks
    async fn ping(&self) -> Result<()>;

    // ===== Users =====

    /// Insert a new user; a taken email or google id is `AlreadyExists`
    async fn insert_user(&self, user: &User) -> Result<()>;
    /// Updates of a missing row are `NotFound`, here and for shifts and applications
    async fn update_user(&self, user: &User) -> Result<()>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;
    /// `email` must already be normalized
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>>;

    // ===== Sessions =====

    async fn insert_session(&self, session: &Session) -> Result<()>;
    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>>;
    async fn delete_session(&self, token_hash: &str) -> Result<()>;

    // ===== Profiles =====

    async fn find_venue_profile(&self, user_id: Uuid) -> Result<Option<VenueProfile>>;
    /// Insert or replace the profile keyed by `user_id`
    async fn upsert_venue_profile(&self, profile: &VenueProfile) -> Result<()>;
    async fn find_professional_profile(&self, user_id: Uuid)
        -> Result<Option<ProfessionalProfile>>;
    async fn upsert_professional_profile(&self, profile: &ProfessionalProfile) -> Result<()>;
    /// Store `strike` and bump the professional's counter in one step
    ///
    /// Returns the new strike count, or `None` (nothing written) when the
    /// application already carries a strike.
    async fn record_strike(&self, strike: &Strike) -> Result<Option<u32>>;

    // ===== Shifts =====

    async fn insert_shift(&self, shift: &Shift) -> Result<()>;
    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>>;
    async fn update_shift_status(&self, id: Uuid, status: ShiftStatus) -> Result<()>;
    /// A hub's shifts ordered by date then start time, optionally for one day
    async fn list_shifts_for_hub(&self, hub_id: Uuid, date: Option<NaiveDate>)
        -> Result<Vec<Shift>>;

    // ===== Applications =====

    /// A second application for the same (shift, professional) is `AlreadyExists`
    async fn insert_application(&self, application: &Application) -> Result<()>;
    async fn update_application(&self, application: &Application) -> Result<()>;
    /// Save `application` as accepted and fill its shift in one step
    ///
    /// Returns `false` (nothing written) when the shift is no longer open, so
    /// two hubs racing on one shift cannot both book it.
    async fn accept_application(&self, application: &Application) -> Result<bool>;
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_application_for(
        &self,
        shift_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<Application>>;
    async fn insert_application_update(&self, update: &ApplicationUpdate) -> Result<()>;
    /// Timeline for one application, oldest first
    async fn list_application_updates(&self, application_id: Uuid)
        -> Result<Vec<ApplicationUpdate>>;

    // ===== Conversations =====

    /// Look up by ordered participant pair and shift
    async fn find_conversation(
        &self,
        participant_a: Uuid,
        participant_b: Uuid,
        shift_id: Option<Uuid>,
    ) -> Result<Option<Conversation>>;
    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()>;
}
