use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::HubError;

/// A two-party message thread, optionally about one shift
///
/// Participants are stored in ascending id order so that (a, b) and (b, a)
/// name the same conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub shift_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(first: Uuid, second: Uuid, shift_id: Option<Uuid>) -> Result<Self, HubError> {
        let (participant_a, participant_b) = ordered_pair(first, second)?;
        Ok(Self {
            id: Uuid::now_v7(),
            participant_a,
            participant_b,
            shift_id,
            created_at: Utc::now(),
        })
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }
}

/// Canonical ordering of a participant pair
pub fn ordered_pair(first: Uuid, second: Uuid) -> Result<(Uuid, Uuid), HubError> {
    if first == second {
        return Err(HubError::SelfConversation);
    }
    Ok(if first < second {
        (first, second)
    } else {
        (second, first)
    })
}
