//! Postgres repository implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use hubshift_core::model::{
    Application, ApplicationUpdate, Conversation, ProfessionalProfile, Session, Shift,
    ShiftStatus, Strike, User, VenueProfile,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::rows::{
    ApplicationRow, ApplicationUpdateRow, ConversationRow, ProfessionalProfileRow, SessionRow,
    ShiftRow, UserRow, VenueProfileRow,
};
use super::Repository;
use crate::errors::{from_sqlx, missing_row, Result};

const USER_COLUMNS: &str = r#"id, email, role, provider, "current_role", google_id, display_name, created_at, updated_at"#;

const SHIFT_COLUMNS: &str = "id, hub_id, title, date, start_time, end_time, hourly_rate_cents, requires_rsa, status, created_at";

const APPLICATION_COLUMNS: &str = "id, shift_id, professional_id, status, created_at, updated_at";

/// `NotFound` when an UPDATE matched no row
fn ensure_updated(rows: u64, table: &str, id: Uuid) -> Result<()> {
    if rows == 0 {
        return Err(missing_row(table, id));
    }
    Ok(())
}

/// Repository over a shared `PgPool`
#[derive(Debug, Clone)]
pub struct PgRepo {
    pool: PgPool,
}

impl PgRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_user(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl Repository for PgRepo {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<()> {
        tracing::debug!(user_id = %user.id, "inserting user");
        sqlx::query(&format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(user.role.map(|r| r.as_str()))
        .bind(user.provider.as_str())
        .bind(user.current_role.map(|r| r.as_str()))
        .bind(&user.google_id)
        .bind(&user.display_name)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"UPDATE users
               SET email = $2, role = $3, provider = $4, "current_role" = $5,
                   google_id = $6, display_name = $7, updated_at = $8
               WHERE id = $1"#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.role.map(|r| r.as_str()))
        .bind(user.provider.as_str())
        .bind(user.current_role.map(|r| r.as_str()))
        .bind(&user.google_id)
        .bind(&user.display_name)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        ensure_updated(result.rows_affected(), "users", user.id)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_user("email", email).await
    }

    async fn find_user_by_google_id(&self, google_id: &str) -> Result<Option<User>> {
        self.fetch_user("google_id", google_id).await
    }

    async fn insert_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token_hash)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT token_hash, user_id, created_at, expires_at
             FROM sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Session::from))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_venue_profile(&self, user_id: Uuid) -> Result<Option<VenueProfile>> {
        let row = sqlx::query_as::<_, VenueProfileRow>(
            "SELECT id, user_id, address, operating_hours, updated_at
             FROM venue_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(VenueProfile::from))
    }

    async fn upsert_venue_profile(&self, profile: &VenueProfile) -> Result<()> {
        sqlx::query(
            "INSERT INTO venue_profiles (id, user_id, address, operating_hours, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                address = excluded.address,
                operating_hours = excluded.operating_hours,
                updated_at = excluded.updated_at",
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(&profile.address)
        .bind(Json(&profile.operating_hours))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_professional_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfessionalProfile>> {
        let row = sqlx::query_as::<_, ProfessionalProfileRow>(
            "SELECT user_id, strikes, completed_shifts, rsa_number, rsa_expires_on
             FROM professional_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(ProfessionalProfile::from))
    }

    async fn upsert_professional_profile(&self, profile: &ProfessionalProfile) -> Result<()> {
        let (rsa_number, rsa_expires_on) = match &profile.rsa {
            Some(cert) => (Some(cert.number.as_str()), Some(cert.expires_on)),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO professional_profiles
                (user_id, strikes, completed_shifts, rsa_number, rsa_expires_on)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id) DO UPDATE SET
                strikes = excluded.strikes,
                completed_shifts = excluded.completed_shifts,
                rsa_number = excluded.rsa_number,
                rsa_expires_on = excluded.rsa_expires_on",
        )
        .bind(profile.user_id)
        .bind(i32::try_from(profile.strikes).unwrap_or(i32::MAX))
        .bind(i32::try_from(profile.completed_shifts).unwrap_or(i32::MAX))
        .bind(rsa_number)
        .bind(rsa_expires_on)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn record_strike(&self, strike: &Strike) -> Result<Option<u32>> {
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;

        let inserted = sqlx::query(
            "INSERT INTO strikes (application_id, professional_id, reason, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (application_id) DO NOTHING",
        )
        .bind(strike.application_id)
        .bind(strike.professional_id)
        .bind(&strike.reason)
        .bind(strike.created_at)
        .execute(&mut *tx)
        .await
        .map_err(from_sqlx)?
        .rows_affected();
        if inserted == 0 {
            tx.rollback().await.map_err(from_sqlx)?;
            return Ok(None);
        }

        let strikes: i32 = sqlx::query_scalar(
            "INSERT INTO professional_profiles (user_id, strikes) VALUES ($1, 1)
             ON CONFLICT (user_id) DO UPDATE
                SET strikes = professional_profiles.strikes + 1
             RETURNING strikes",
        )
        .bind(strike.professional_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(from_sqlx)?;

        tx.commit().await.map_err(from_sqlx)?;
        Ok(Some(u32::try_from(strikes).unwrap_or(0)))
    }

    async fn insert_shift(&self, shift: &Shift) -> Result<()> {
        tracing::debug!(shift_id = %shift.id, hub_id = %shift.hub_id, "inserting shift");
        sqlx::query(&format!(
            "INSERT INTO shifts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            SHIFT_COLUMNS
        ))
        .bind(shift.id)
        .bind(shift.hub_id)
        .bind(&shift.title)
        .bind(shift.date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.hourly_rate_cents)
        .bind(shift.requires_rsa)
        .bind(shift.status.as_str())
        .bind(shift.created_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn find_shift(&self, id: Uuid) -> Result<Option<Shift>> {
        let sql = format!("SELECT {} FROM shifts WHERE id = $1", SHIFT_COLUMNS);
        sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?
            .map(Shift::try_from)
            .transpose()
    }

    async fn update_shift_status(&self, id: Uuid, status: ShiftStatus) -> Result<()> {
        let result = sqlx::query("UPDATE shifts SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(from_sqlx)?;
        ensure_updated(result.rows_affected(), "shifts", id)
    }

    async fn list_shifts_for_hub(
        &self,
        hub_id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Shift>> {
        let sql = format!(
            "SELECT {} FROM shifts
             WHERE hub_id = $1 AND ($2::date IS NULL OR date = $2)
             ORDER BY date, start_time",
            SHIFT_COLUMNS
        );
        sqlx::query_as::<_, ShiftRow>(&sql)
            .bind(hub_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx)?
            .into_iter()
            .map(Shift::try_from)
            .collect()
    }

    async fn insert_application(&self, application: &Application) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO applications ({}) VALUES ($1, $2, $3, $4, $5, $6)",
            APPLICATION_COLUMNS
        ))
        .bind(application.id)
        .bind(application.shift_id)
        .bind(application.professional_id)
        .bind(application.status.as_str())
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn update_application(&self, application: &Application) -> Result<()> {
        let result =
            sqlx::query("UPDATE applications SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(application.id)
                .bind(application.status.as_str())
                .bind(application.updated_at)
                .execute(&self.pool)
                .await
                .map_err(from_sqlx)?;
        ensure_updated(result.rows_affected(), "applications", application.id)
    }

    async fn accept_application(&self, application: &Application) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(from_sqlx)?;

        let filled = sqlx::query("UPDATE shifts SET status = $2 WHERE id = $1 AND status = $3")
            .bind(application.shift_id)
            .bind(ShiftStatus::Filled.as_str())
            .bind(ShiftStatus::Open.as_str())
            .execute(&mut *tx)
            .await
            .map_err(from_sqlx)?
            .rows_affected();
        if filled == 0 {
            tx.rollback().await.map_err(from_sqlx)?;
            return Ok(false);
        }

        let updated =
            sqlx::query("UPDATE applications SET status = $2, updated_at = $3 WHERE id = $1")
                .bind(application.id)
                .bind(application.status.as_str())
                .bind(application.updated_at)
                .execute(&mut *tx)
                .await
                .map_err(from_sqlx)?
                .rows_affected();
        if updated == 0 {
            tx.rollback().await.map_err(from_sqlx)?;
            return Err(missing_row("applications", application.id));
        }

        tx.commit().await.map_err(from_sqlx)?;
        tracing::debug!(
            application_id = %application.id,
            shift_id = %application.shift_id,
            "shift filled"
        );
        Ok(true)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?
            .map(Application::try_from)
            .transpose()
    }

    async fn find_application_for(
        &self,
        shift_id: Uuid,
        professional_id: Uuid,
    ) -> Result<Option<Application>> {
        let sql = format!(
            "SELECT {} FROM applications WHERE shift_id = $1 AND professional_id = $2",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(shift_id)
            .bind(professional_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx)?
            .map(Application::try_from)
            .transpose()
    }

    async fn insert_application_update(&self, update: &ApplicationUpdate) -> Result<()> {
        sqlx::query(
            "INSERT INTO application_updates (id, application_id, kind, message, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(update.id)
        .bind(update.application_id)
        .bind(update.kind.as_str())
        .bind(&update.message)
        .bind(update.created_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }

    async fn list_application_updates(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationUpdate>> {
        sqlx::query_as::<_, ApplicationUpdateRow>(
            "SELECT id, application_id, kind, message, created_at
             FROM application_updates
             WHERE application_id = $1
             ORDER BY created_at, id",
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx)?
        .into_iter()
        .map(ApplicationUpdate::try_from)
        .collect()
    }

    async fn find_conversation(
        &self,
        participant_a: Uuid,
        participant_b: Uuid,
        shift_id: Option<Uuid>,
    ) -> Result<Option<Conversation>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT id, participant_a, participant_b, shift_id, created_at
             FROM conversations
             WHERE participant_a = $1 AND participant_b = $2
               AND shift_id IS NOT DISTINCT FROM $3",
        )
        .bind(participant_a)
        .bind(participant_b)
        .bind(shift_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(row.map(Conversation::from))
    }

    async fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        sqlx::query(
            "INSERT INTO conversations (id, participant_a, participant_b, shift_id, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(conversation.id)
        .bind(conversation.participant_a)
        .bind(conversation.participant_b)
        .bind(conversation.shift_id)
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx)?;
        Ok(())
    }
}
