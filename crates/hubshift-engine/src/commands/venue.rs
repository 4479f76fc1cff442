//! Venue profile commands (hub side)

use chrono::Utc;
use hubshift_core::errors::HubError;
use hubshift_core::model::{OperatingHours, Role, User, VenueProfile};
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use serde::Deserialize;
use std::time::Instant;

use super::require_role;

/// Editable venue fields
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueProfileInput {
    pub address: String,
    #[serde(default)]
    pub operating_hours: OperatingHours,
}

pub async fn get_venue_profile(repo: &dyn Repository, user: &User) -> Result<VenueProfile> {
    require_role(user, Role::Hub)?;
    let profile = repo
        .find_venue_profile(user.id)
        .await?
        .ok_or_else(|| HubError::VenueProfileNotFound {
            user_id: user.id.to_string(),
        })?;
    Ok(profile)
}

/// Create or replace the hub's venue profile
///
/// ## Errors
///
/// - `Forbidden`: the user is not acting as a hub
/// - `InvalidInput` / `InvalidTimeRange`: empty address or zero-length hours
pub async fn save_venue_profile(
    repo: &dyn Repository,
    user: &User,
    input: VenueProfileInput,
) -> Result<VenueProfile> {
    log_op_start!("save_venue_profile", user_id = %user.id);
    let start = Instant::now();

    let result = save_venue_profile_impl(repo, user, input)
        .await
        .map_err(|e| {
            log_op_error!(
                "save_venue_profile",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "save_venue_profile",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

async fn save_venue_profile_impl(
    repo: &dyn Repository,
    user: &User,
    input: VenueProfileInput,
) -> Result<VenueProfile> {
    require_role(user, Role::Hub)?;

    let profile = match repo.find_venue_profile(user.id).await? {
        Some(existing) => VenueProfile {
            address: input.address.trim().to_string(),
            operating_hours: input.operating_hours,
            updated_at: Utc::now(),
            ..existing
        },
        None => VenueProfile::new(
            user.id,
            input.address.trim().to_string(),
            input.operating_hours,
        ),
    };
    profile.validate()?;

    repo.upsert_venue_profile(&profile).await?;
    Ok(profile)
}
