//! Row types for `PgRepo` and their conversion into domain models
//!
//! Enums are stored as lowercase TEXT and parsed back with `FromStr`; a value
//! that fails to parse is reported as a corrupt row.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use hubshift_core::errors::ExError;
use hubshift_core::model::{
    Application, ApplicationUpdate, Conversation, OperatingHours, ProfessionalProfile, Role,
    RsaCertificate, Session, Shift, User, VenueProfile,
};
use sqlx::types::Json;
use uuid::Uuid;

use crate::errors::corrupt_row;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    email: String,
    role: Option<String>,
    provider: String,
    current_role: Option<String>,
    google_id: Option<String>,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = ExError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let parse_role = |value: Option<String>| {
            value
                .map(|v| v.parse::<Role>())
                .transpose()
                .map_err(|e| corrupt_row("users", e))
        };
        Ok(User {
            id: row.id,
            email: row.email,
            role: parse_role(row.role)?,
            provider: row.provider.parse().map_err(|e| corrupt_row("users", e))?,
            current_role: parse_role(row.current_role)?,
            google_id: row.google_id,
            display_name: row.display_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SessionRow {
    token_hash: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token_hash: row.token_hash,
            user_id: row.user_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VenueProfileRow {
    id: Uuid,
    user_id: Uuid,
    address: String,
    operating_hours: Json<OperatingHours>,
    updated_at: DateTime<Utc>,
}

impl From<VenueProfileRow> for VenueProfile {
    fn from(row: VenueProfileRow) -> Self {
        VenueProfile {
            id: row.id,
            user_id: row.user_id,
            address: row.address,
            operating_hours: row.operating_hours.0,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfessionalProfileRow {
    user_id: Uuid,
    strikes: i32,
    completed_shifts: i32,
    rsa_number: Option<String>,
    rsa_expires_on: Option<NaiveDate>,
}

impl From<ProfessionalProfileRow> for ProfessionalProfile {
    fn from(row: ProfessionalProfileRow) -> Self {
        let rsa = match (row.rsa_number, row.rsa_expires_on) {
            (Some(number), Some(expires_on)) => Some(RsaCertificate { number, expires_on }),
            _ => None,
        };
        ProfessionalProfile {
            user_id: row.user_id,
            // CHECK constraints keep both columns non-negative
            strikes: u32::try_from(row.strikes).unwrap_or(0),
            completed_shifts: u32::try_from(row.completed_shifts).unwrap_or(0),
            rsa,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShiftRow {
    id: Uuid,
    hub_id: Uuid,
    title: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    hourly_rate_cents: i64,
    requires_rsa: bool,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = ExError;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        Ok(Shift {
            id: row.id,
            hub_id: row.hub_id,
            title: row.title,
            date: row.date,
            start_time: row.start_time,
            end_time: row.end_time,
            hourly_rate_cents: row.hourly_rate_cents,
            requires_rsa: row.requires_rsa,
            status: row.status.parse().map_err(|e| corrupt_row("shifts", e))?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ApplicationRow {
    id: Uuid,
    shift_id: Uuid,
    professional_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = ExError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            shift_id: row.shift_id,
            professional_id: row.professional_id,
            status: row
                .status
                .parse()
                .map_err(|e| corrupt_row("applications", e))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ApplicationUpdateRow {
    id: Uuid,
    application_id: Uuid,
    kind: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationUpdateRow> for ApplicationUpdate {
    type Error = ExError;

    fn try_from(row: ApplicationUpdateRow) -> Result<Self, Self::Error> {
        Ok(ApplicationUpdate {
            id: row.id,
            application_id: row.application_id,
            kind: row
                .kind
                .parse()
                .map_err(|e| corrupt_row("application_updates", e))?,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ConversationRow {
    id: Uuid,
    participant_a: Uuid,
    participant_b: Uuid,
    shift_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: row.id,
            participant_a: row.participant_a,
            participant_b: row.participant_b,
            shift_id: row.shift_id,
            created_at: row.created_at,
        }
    }
}
