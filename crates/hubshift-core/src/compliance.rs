//! Eligibility rules for shift applications

use crate::errors::HubError;
use crate::model::{ProfessionalProfile, Shift, ShiftStatus};
use crate::reliability::ReliabilityBadge;

/// Check that `profile` may apply to `shift`
///
/// Rules are checked in order: the shift is open, the professional is not
/// suspended, the RSA certificate (when required) is valid on the shift date,
/// and there is no earlier application.
pub fn check_application_eligibility(
    profile: &ProfessionalProfile,
    shift: &Shift,
    already_applied: bool,
) -> Result<(), HubError> {
    if shift.status != ShiftStatus::Open {
        return Err(HubError::ShiftNotOpen {
            shift_id: shift.id.to_string(),
            status: shift.status.as_str().to_string(),
        });
    }

    if !ReliabilityBadge::from_strikes(profile.strikes).can_apply() {
        return Err(HubError::ProfessionalSuspended {
            user_id: profile.user_id.to_string(),
        });
    }

    if shift.requires_rsa {
        check_rsa(profile, shift)?;
    }

    if already_applied {
        return Err(HubError::DuplicateApplication {
            user_id: profile.user_id.to_string(),
            shift_id: shift.id.to_string(),
        });
    }

    Ok(())
}

fn check_rsa(profile: &ProfessionalProfile, shift: &Shift) -> Result<(), HubError> {
    match &profile.rsa {
        None => Err(HubError::RsaCertificateRequired {
            shift_id: shift.id.to_string(),
        }),
        Some(cert) if !cert.covers(shift.date) => Err(HubError::RsaCertificateExpired {
            expired_on: cert.expires_on.to_string(),
            shift_date: shift.date.to_string(),
        }),
        Some(_) => Ok(()),
    }
}
