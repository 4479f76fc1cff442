//! Shift applications and their timelines

use hubshift_core::compliance::check_application_eligibility;
use hubshift_core::errors::HubError;
use hubshift_core::model::{
    Application, ApplicationStatus, ApplicationUpdate, ProfessionalProfile, Role, Shift,
    ShiftStatus, Strike, User,
};
use hubshift_core::notifications::{NotificationKind, NotificationStyle};
use hubshift_core::reliability::{ReliabilitySummary, SUSPENSION_STRIKES};
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

use super::require_role;

/// Timeline entry with its presentation attached
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationUpdateView {
    #[serde(flatten)]
    pub update: ApplicationUpdate,
    #[serde(flatten)]
    pub style: NotificationStyle,
}

impl From<ApplicationUpdate> for ApplicationUpdateView {
    fn from(update: ApplicationUpdate) -> Self {
        let style = update.kind.style();
        Self { update, style }
    }
}

async fn load_application(repo: &dyn Repository, id: Uuid) -> Result<(Application, Shift)> {
    let application = repo
        .find_application(id)
        .await?
        .ok_or_else(|| HubError::ApplicationNotFound {
            application_id: id.to_string(),
        })?;
    let shift = repo
        .find_shift(application.shift_id)
        .await?
        .ok_or_else(|| HubError::ShiftNotFound {
            shift_id: application.shift_id.to_string(),
        })?;
    Ok((application, shift))
}

fn access_denied(user: &User, application: &Application) -> HubError {
    HubError::AccessDenied {
        user_id: user.id.to_string(),
        entity_id: application.id.to_string(),
    }
}

/// Apply to an open shift as the signed-in professional
///
/// ## Errors
///
/// - `NotFound`: unknown shift
/// - `ShiftNotOpen`: the shift is filled or cancelled
/// - `ComplianceViolation`: suspended, or the shift needs an RSA certificate
///   valid on the shift date
/// - `AlreadyExists`: already applied
pub async fn apply_to_shift(
    repo: &dyn Repository,
    user: &User,
    shift_id: Uuid,
) -> Result<Application> {
    log_op_start!("apply_to_shift", user_id = %user.id, shift_id = %shift_id);
    let start = Instant::now();

    let result = apply_to_shift_impl(repo, user, shift_id)
        .await
        .map_err(|e| {
            log_op_error!(
                "apply_to_shift",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "apply_to_shift",
        duration_ms = start.elapsed().as_millis() as u64,
        application_id = %result.id
    );
    Ok(result)
}

async fn apply_to_shift_impl(
    repo: &dyn Repository,
    user: &User,
    shift_id: Uuid,
) -> Result<Application> {
    require_role(user, Role::Professional)?;

    let shift = repo
        .find_shift(shift_id)
        .await?
        .ok_or_else(|| HubError::ShiftNotFound {
            shift_id: shift_id.to_string(),
        })?;
    let profile = repo
        .find_professional_profile(user.id)
        .await?
        .unwrap_or_else(|| ProfessionalProfile::new(user.id));
    let already_applied = repo.find_application_for(shift.id, user.id).await?.is_some();

    check_application_eligibility(&profile, &shift, already_applied)?;

    let application = Application::new(shift.id, user.id);
    repo.insert_application(&application).await?;
    repo.insert_application_update(&ApplicationUpdate::new(
        application.id,
        NotificationKind::ApplicationSubmitted,
        format!("Applied for {} on {}", shift.title, shift.date),
    ))
    .await?;

    Ok(application)
}

/// Timeline of an application, visible to its professional and to the hub
/// that posted the shift
pub async fn list_application_updates(
    repo: &dyn Repository,
    user: &User,
    application_id: Uuid,
) -> Result<Vec<ApplicationUpdateView>> {
    let (application, shift) = load_application(repo, application_id).await?;
    if application.professional_id != user.id && shift.hub_id != user.id {
        return Err(access_denied(user, &application).into());
    }

    let updates = repo.list_application_updates(application.id).await?;
    Ok(updates.into_iter().map(ApplicationUpdateView::from).collect())
}

/// Move an application to `next`
///
/// The hub that posted the shift accepts or rejects; the professional may
/// withdraw. Accepting fills the shift; withdrawing an accepted application
/// reopens it.
///
/// ## Errors
///
/// - `Forbidden`: the user may not make this change
/// - `Conflict`: the transition is not allowed from the current status
/// - `ShiftNotOpen`: accepting onto a shift that is no longer open
pub async fn update_application_status(
    repo: &dyn Repository,
    user: &User,
    application_id: Uuid,
    next: ApplicationStatus,
) -> Result<Application> {
    log_op_start!(
        "update_application_status",
        user_id = %user.id,
        application_id = %application_id,
        status = next.as_str()
    );
    let start = Instant::now();

    let result = update_application_status_impl(repo, user, application_id, next)
        .await
        .map_err(|e| {
            log_op_error!(
                "update_application_status",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "update_application_status",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

async fn update_application_status_impl(
    repo: &dyn Repository,
    user: &User,
    application_id: Uuid,
    next: ApplicationStatus,
) -> Result<Application> {
    let (mut application, shift) = load_application(repo, application_id).await?;

    match next {
        ApplicationStatus::Withdrawn => {
            require_role(user, Role::Professional)?;
            if application.professional_id != user.id {
                return Err(access_denied(user, &application).into());
            }
        }
        ApplicationStatus::Accepted | ApplicationStatus::Rejected => {
            require_role(user, Role::Hub)?;
            if shift.hub_id != user.id {
                return Err(access_denied(user, &application).into());
            }
        }
        ApplicationStatus::Pending => {
            return Err(HubError::InvalidInput {
                reason: "Applications cannot be moved back to pending".to_string(),
            }
            .into());
        }
    }

    if next == ApplicationStatus::Accepted && shift.status != ShiftStatus::Open {
        return Err(HubError::ShiftNotOpen {
            shift_id: shift.id.to_string(),
            status: shift.status.as_str().to_string(),
        }
        .into());
    }

    let previous = application.status;
    application.transition(next)?;

    if next == ApplicationStatus::Accepted {
        if !repo.accept_application(&application).await? {
            let status = repo
                .find_shift(shift.id)
                .await?
                .map_or(shift.status, |current| current.status);
            return Err(HubError::ShiftNotOpen {
                shift_id: shift.id.to_string(),
                status: status.as_str().to_string(),
            }
            .into());
        }
    } else {
        repo.update_application(&application).await?;
        if previous == ApplicationStatus::Accepted && shift.status == ShiftStatus::Filled {
            repo.update_shift_status(shift.id, ShiftStatus::Open).await?;
        }
    }

    let message = match next {
        ApplicationStatus::Accepted => {
            format!("You're booked for {} on {}", shift.title, shift.date)
        }
        ApplicationStatus::Rejected => {
            format!("{} on {} went to another applicant", shift.title, shift.date)
        }
        _ => format!("Application for {} withdrawn", shift.title),
    };
    repo.insert_application_update(&ApplicationUpdate::new(
        application.id,
        next.notification_kind(),
        message,
    ))
    .await?;

    Ok(application)
}

/// Record a strike (e.g. a no-show) against the professional on an accepted
/// application, at most once per application
///
/// ## Errors
///
/// - `Forbidden`: the user did not post the shift
/// - `InvalidInput`: the application was never accepted
/// - `AlreadyExists`: the application already carries a strike
pub async fn issue_strike(
    repo: &dyn Repository,
    user: &User,
    application_id: Uuid,
    reason: Option<String>,
) -> Result<ReliabilitySummary> {
    log_op_start!("issue_strike", user_id = %user.id, application_id = %application_id);
    let start = Instant::now();

    let result = issue_strike_impl(repo, user, application_id, reason)
        .await
        .map_err(|e| {
            log_op_error!(
                "issue_strike",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "issue_strike",
        duration_ms = start.elapsed().as_millis() as u64,
        strikes = result.strikes
    );
    Ok(result)
}

async fn issue_strike_impl(
    repo: &dyn Repository,
    user: &User,
    application_id: Uuid,
    reason: Option<String>,
) -> Result<ReliabilitySummary> {
    require_role(user, Role::Hub)?;
    let (application, shift) = load_application(repo, application_id).await?;
    if shift.hub_id != user.id {
        return Err(access_denied(user, &application).into());
    }
    if application.status != ApplicationStatus::Accepted {
        return Err(HubError::InvalidInput {
            reason: "Strikes can only be issued on accepted applications".to_string(),
        }
        .into());
    }

    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "no-show".to_string());
    let strike = Strike::new(application.id, application.professional_id, reason);
    let strikes = repo
        .record_strike(&strike)
        .await?
        .ok_or_else(|| HubError::StrikeAlreadyIssued {
            application_id: application.id.to_string(),
        })?;

    repo.insert_application_update(&ApplicationUpdate::new(
        application.id,
        NotificationKind::StrikeIssued,
        format!(
            "Strike {} of {} for {}: {}",
            strikes, SUSPENSION_STRIKES, shift.title, strike.reason
        ),
    ))
    .await?;

    let completed_shifts = repo
        .find_professional_profile(application.professional_id)
        .await?
        .map_or(0, |profile| profile.completed_shifts);
    Ok(ReliabilitySummary::new(strikes, completed_shifts))
}
