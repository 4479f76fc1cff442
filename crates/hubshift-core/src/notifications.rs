//! Notification kinds and their icon/colour presentation

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationSubmitted,
    ApplicationAccepted,
    ApplicationRejected,
    ApplicationWithdrawn,
    NewMessage,
    ShiftReminder,
    ShiftCancelled,
    StrikeIssued,
    System,
}

/// Icon name and colour token for the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 9] = [
        NotificationKind::ApplicationSubmitted,
        NotificationKind::ApplicationAccepted,
        NotificationKind::ApplicationRejected,
        NotificationKind::ApplicationWithdrawn,
        NotificationKind::NewMessage,
        NotificationKind::ShiftReminder,
        NotificationKind::ShiftCancelled,
        NotificationKind::StrikeIssued,
        NotificationKind::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ApplicationSubmitted => "application_submitted",
            NotificationKind::ApplicationAccepted => "application_accepted",
            NotificationKind::ApplicationRejected => "application_rejected",
            NotificationKind::ApplicationWithdrawn => "application_withdrawn",
            NotificationKind::NewMessage => "new_message",
            NotificationKind::ShiftReminder => "shift_reminder",
            NotificationKind::ShiftCancelled => "shift_cancelled",
            NotificationKind::StrikeIssued => "strike_issued",
            NotificationKind::System => "system",
        }
    }

    pub fn style(&self) -> NotificationStyle {
        let (icon, color) = match self {
            NotificationKind::ApplicationSubmitted => ("send", "blue"),
            NotificationKind::ApplicationAccepted => ("check-circle", "green"),
            NotificationKind::ApplicationRejected => ("x-circle", "red"),
            NotificationKind::ApplicationWithdrawn => ("undo", "gray"),
            NotificationKind::NewMessage => ("message-square", "purple"),
            NotificationKind::ShiftReminder => ("clock", "amber"),
            NotificationKind::ShiftCancelled => ("calendar-x", "red"),
            NotificationKind::StrikeIssued => ("alert-triangle", "orange"),
            NotificationKind::System => ("bell", "gray"),
        };
        NotificationStyle { icon, color }
    }
}

impl FromStr for NotificationKind {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| HubError::InvalidInput {
                reason: format!("unknown notification kind: {}", s),
            })
    }
}
