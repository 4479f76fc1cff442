use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::HubError;
use crate::notifications::NotificationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Pending may go anywhere; an accepted application may still be withdrawn
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (*self, next),
            (Pending, Accepted) | (Pending, Rejected) | (Pending, Withdrawn) | (Accepted, Withdrawn)
        )
    }

    /// Notification raised when an application enters this status
    pub fn notification_kind(&self) -> NotificationKind {
        match self {
            ApplicationStatus::Pending => NotificationKind::ApplicationSubmitted,
            ApplicationStatus::Accepted => NotificationKind::ApplicationAccepted,
            ApplicationStatus::Rejected => NotificationKind::ApplicationRejected,
            ApplicationStatus::Withdrawn => NotificationKind::ApplicationWithdrawn,
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "withdrawn" => Ok(ApplicationStatus::Withdrawn),
            other => Err(HubError::InvalidInput {
                reason: format!("unknown application status: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub shift_id: Uuid,
    pub professional_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(shift_id: Uuid, professional_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            shift_id,
            professional_id,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition(&mut self, next: ApplicationStatus) -> Result<(), HubError> {
        if !self.status.can_transition_to(next) {
            return Err(HubError::IllegalStatusTransition {
                application_id: self.id.to_string(),
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// One entry in an application's timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    pub id: Uuid,
    pub application_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ApplicationUpdate {
    pub fn new(application_id: Uuid, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            application_id,
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Accepted.can_transition_to(Withdrawn));
        assert!(!Rejected.can_transition_to(Accepted));
        assert!(!Withdrawn.can_transition_to(Pending));
        assert!(!Accepted.can_transition_to(Rejected));
    }

    #[test]
    fn test_illegal_transition_leaves_status_unchanged() {
        let mut app = Application::new(Uuid::now_v7(), Uuid::now_v7());
        app.transition(ApplicationStatus::Rejected).unwrap();
        let err = app.transition(ApplicationStatus::Accepted).unwrap_err();
        assert!(matches!(err, HubError::IllegalStatusTransition { .. }));
        assert_eq!(app.status, ApplicationStatus::Rejected);
    }
}
