//! Conversations between hubs and professionals

use hubshift_core::errors::{ExErrorKind, HubError};
use hubshift_core::model::{conversation::ordered_pair, Conversation, User};
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use std::time::Instant;
use uuid::Uuid;

/// Start a conversation with another user, or return the existing one for
/// the same pair and shift
///
/// Returns the conversation and whether it was created by this call.
///
/// ## Errors
///
/// - `InvalidInput`: messaging yourself
/// - `NotFound`: unknown participant or shift
pub async fn start_conversation(
    repo: &dyn Repository,
    user: &User,
    other_user_id: Uuid,
    shift_id: Option<Uuid>,
) -> Result<(Conversation, bool)> {
    log_op_start!("start_conversation", user_id = %user.id);
    let start = Instant::now();

    let result = start_conversation_impl(repo, user, other_user_id, shift_id)
        .await
        .map_err(|e| {
            log_op_error!(
                "start_conversation",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "start_conversation",
        duration_ms = start.elapsed().as_millis() as u64,
        conversation_id = %result.0.id,
        created = result.1
    );
    Ok(result)
}

async fn start_conversation_impl(
    repo: &dyn Repository,
    user: &User,
    other_user_id: Uuid,
    shift_id: Option<Uuid>,
) -> Result<(Conversation, bool)> {
    let (participant_a, participant_b) = ordered_pair(user.id, other_user_id)?;

    if repo.find_user(other_user_id).await?.is_none() {
        return Err(HubError::UserNotFound {
            user_id: other_user_id.to_string(),
        }
        .into());
    }
    if let Some(shift_id) = shift_id {
        if repo.find_shift(shift_id).await?.is_none() {
            return Err(HubError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            }
            .into());
        }
    }

    if let Some(existing) = repo
        .find_conversation(participant_a, participant_b, shift_id)
        .await?
    {
        return Ok((existing, false));
    }

    let conversation = Conversation::new(user.id, other_user_id, shift_id)?;
    match repo.insert_conversation(&conversation).await {
        Ok(()) => Ok((conversation, true)),
        // Lost a race with the other participant
        Err(e) if e.kind() == ExErrorKind::AlreadyExists => repo
            .find_conversation(participant_a, participant_b, shift_id)
            .await?
            .map(|existing| (existing, false))
            .ok_or(e),
        Err(e) => Err(e),
    }
}
