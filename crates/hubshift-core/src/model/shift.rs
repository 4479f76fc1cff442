use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Open,
    Filled,
    Cancelled,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Open => "open",
            ShiftStatus::Filled => "filled",
            ShiftStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ShiftStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(ShiftStatus::Open),
            "filled" => Ok(ShiftStatus::Filled),
            "cancelled" => Ok(ShiftStatus::Cancelled),
            other => Err(HubError::InvalidInput {
                reason: format!("unknown shift status: {}", other),
            }),
        }
    }
}

/// A shift posted by a hub. An `end_time` earlier than `start_time` means the
/// shift finishes the next morning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub hub_id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hourly_rate_cents: i64,
    pub requires_rsa: bool,
    pub status: ShiftStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields a hub supplies when posting a shift
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub requires_rsa: bool,
}

impl Shift {
    pub fn from_new(hub_id: Uuid, new: NewShift) -> Result<Self, HubError> {
        if new.title.trim().is_empty() {
            return Err(HubError::InvalidInput {
                reason: "Shift title cannot be empty".to_string(),
            });
        }
        if new.start_time == new.end_time {
            return Err(HubError::InvalidTimeRange {
                reason: "Shift cannot start and end at the same time".to_string(),
            });
        }
        if new.hourly_rate_cents <= 0 {
            return Err(HubError::InvalidInput {
                reason: "Hourly rate must be positive".to_string(),
            });
        }
        Ok(Self {
            id: Uuid::now_v7(),
            hub_id,
            title: new.title.trim().to_string(),
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            hourly_rate_cents: new.hourly_rate_cents,
            requires_rsa: new.requires_rsa,
            status: ShiftStatus::Open,
            created_at: Utc::now(),
        })
    }

    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }

    pub fn duration_minutes(&self) -> i64 {
        let minutes = (self.end_time - self.start_time).num_minutes();
        if self.is_overnight() {
            minutes + 24 * 60
        } else {
            minutes
        }
    }

    /// Gross pay for the whole shift, rounded down to the cent
    pub fn total_pay_cents(&self) -> i64 {
        self.hourly_rate_cents * self.duration_minutes() / 60
    }
}
