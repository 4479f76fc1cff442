//! In-process repository
//!
//! Mirrors the Postgres constraints that callers rely on: unique email and
//! google id, one application per (shift, professional), one strike per
//! application, one conversation per (participant pair, shift). Compound
//! writes happen under a single write lock.

use async_trait::async_trait;
use chrono::NaiveDate;
use hubshift_core::errors::{ExError, ExErrorKind};
use hubshift_core::model::{
    Application, ApplicationUpdate, Conversation, ProfessionalProfile, Session, Shift,
    ShiftStatus, Strike, User, VenueProfile,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::Repository;
use crate::errors::{missing_row, Result};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    venue_profiles: HashMap<Uuid, VenueProfile>,
    professional_profiles: HashMap<Uuid, ProfessionalProfile>,
    strikes: HashMap<Uuid, Strike>,
    shifts: HashMap<Uuid, Shift>,
    applications: HashMap<Uuid, Application>,
    application_updates: Vec<ApplicationUpdate>,
    conversations: Vec<Conversation>,
}

#[derive(Debug, Default)]
pub struct MemoryRepo {
    tables: RwLock<Tables>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate(table: &str, detail: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op("memory")
        .with_message(format!("duplicate key in {}: {}", table, detail))
}

#[async_trait]
impl Repository for MemoryRepo {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(duplicate("users", user.id));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(duplicate("users", &user.email));
        }
        if let Some(google_id) = &user.google_id {
            if tables
                .users
                .values()
                .any(|u| u.google_id.as_ref() == Some(google_id))
            {
                return Err(duplicate("users", google_id));
            }
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(missing_row("users", user.id)),
        }
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.sessions.contains_key(&session.token_hash) {
            return Err(duplicate("sessions", "token_hash"));
        }
        tables
            .sessions
            .insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(token_hash).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<()> {
        self.tables.write().await.sessions.remove(token_hash);
        Ok(())
    }

    async fn find_venue_profile(&self, user_id: Uuid) -> Result<Option<VenueProfile>> {
        Ok(self
            .tables
            .read()
            .await
            .venue_profiles
            .get(&user_id)
            .cloned())
    }

    async fn upsert_venue_profile(&self, profile: &VenueProfile) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = match tables.venue_profiles.get(&profile.user_id) {
            // Keep the original row id, as ON CONFLICT (user_id) does
            Some(existing) => VenueProfile {
                id: existing.id,
                ..profile.clone()
            },
            None => profile.clone(),
        };
        tables.venue_profiles.insert(profile.user_id, stored);
        Ok(())
    }

    async fn find_professional_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfessionalProfile>> {
        Ok(self
            .tables
            .read()
            .await
            .professional_profiles
            .get(&user_id)
            .cloned())
    }

    async fn upsert_professional_profile(&self, profile: &ProfessionalProfile) -> Result<()> {
        self.tables
            .write()
            .await
            .professional_profiles
            .insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn record_strike(&self, strike: &Strike) -> Result<Option<u32>> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        if !tables.applications.contains_key(&strike.application_id) {
            return Err(missing_row("applications", strike.application_id));
        }
        if tables.strikes.contains_key(&strike.application_id) {
            return Ok(None);
        }
        tables.strikes.insert(strike.application_id, strike.clone());

        let profile = tables
            .professional_profiles
            .entry(strike.professional_id)
            .or_insert_with(|| ProfessionalProfile::new(strike.professional_id));
        profile.strikes = profile.strikes.saturating_add(1);
        Ok(Some(profile.strikes))
    }

    async fn insert_shift(&self, shift: &Shift) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&shift.hub_id) {
            return Err(missing_row("users", shift.hub_id));
        }
        if tables.shifts.contains_key(&shift.id) {
            return Err(duplicate("shifts", shift.id));
        }
        tables.shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        Ok(self.tables.read().await.shifts.get(&id).cloned())
    }

    async fn update_shift_status(&self, id: Uuid, status: ShiftStatus) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.shifts.get_mut(&id) {
            Some(shift) => {
                shift.status = status;
                Ok(())
            }
            None => Err(missing_row("shifts", id)),
        }
    }

    async fn list_shifts_for_hub(
        &self,
        hub_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Shift>> {
        let tables = self.tables.read().await;
        let mut shifts: Vec<Shift> = tables
            .shifts
            .values()
            .filter(|s| s.hub_id == hub_id && date.map_or(true, |d| s.date == d))
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.date, s.start_time));
        Ok(shifts)
    }

    async fn insert_application(&self, application: &Application) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.shifts.contains_key(&application.shift_id) {
            return Err(missing_row("shifts", application.shift_id));
        }
        if tables.applications.values().any(|a| {
            a.shift_id == application.shift_id && a.professional_id == application.professional_id
        }) {
            return Err(duplicate("applications", "(shift_id, professional_id)"));
        }
        tables
            .applications
            .insert(application.id, application.clone());
        Ok(())
    }

    async fn update_application(&self, application: &Application) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.applications.get_mut(&application.id) {
            Some(existing) => {
                existing.status = application.status;
                existing.updated_at = application.updated_at;
                Ok(())
            }
            None => Err(missing_row("applications", application.id)),
        }
    }

    async fn accept_application(&self, application: &Application) -> Result<bool> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let Some(stored) = tables.applications.get_mut(&application.id) else {
            return Err(missing_row("applications", application.id));
        };
        let Some(shift) = tables.shifts.get_mut(&application.shift_id) else {
            return Err(missing_row("shifts", application.shift_id));
        };
        if shift.status != ShiftStatus::Open {
            return Ok(false);
        }
        shift.status = ShiftStatus::Filled;
        stored.status = application.status;
        stored.updated_at = application.updated_at;
        Ok(true)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn find_application_for(
        &self,
        shift_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .find(|a| a.shift_id == shift_id && a.professional_id == professional_id)
            .cloned())
    }

    async fn insert_application_update(&self, update: &ApplicationUpdate) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.applications.contains_key(&update.application_id) {
            return Err(missing_row("applications", update.application_id));
        }
        tables.application_updates.push(update.clone());
        Ok(())
    }

    async fn list_application_updates(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationUpdate>> {
        let tables = self.tables.read().await;
        let mut updates: Vec<ApplicationUpdate> = tables
            .application_updates
            .iter()
            .filter(|u| u.application_id == application_id)
            .cloned()
            .collect();
        updates.sort_by_key(|u| (u.created_at, u.id));
        Ok(updates)
    }

    async fn find_conversation(
        &self,
        participant_a: Uuid,
        participant_b: Uuid,
        shift_id: Option<Uuid>,
    ) -> Result<Option<Conversation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .conversations
            .iter()
            .find(|c| {
                c.participant_a == participant_a
                    && c.participant_b == participant_b
                    && c.shift_id == shift_id
            })
            .cloned())
    }

    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.conversations.iter().any(|c| {
            c.participant_a == conversation.participant_a
                && c.participant_b == conversation.participant_b
                && c.shift_id == conversation.shift_id
        }) {
            return Err(duplicate("conversations", "(participants, shift_id)"));
        }
        tables.conversations.push(conversation.clone());
        Ok(())
    }
}
