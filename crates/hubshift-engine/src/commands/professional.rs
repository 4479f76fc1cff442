//! Professional profile and reliability

use hubshift_core::errors::HubError;
use hubshift_core::model::{ProfessionalProfile, Role, RsaCertificate, User};
use hubshift_core::reliability::ReliabilitySummary;
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use std::time::Instant;

use super::require_role;

/// The professional's profile, or a fresh one if none is stored yet
pub async fn professional_profile(
    repo: &dyn Repository,
    user: &User,
) -> Result<ProfessionalProfile> {
    require_role(user, Role::Professional)?;
    Ok(repo
        .find_professional_profile(user.id)
        .await?
        .unwrap_or_else(|| ProfessionalProfile::new(user.id)))
}

pub async fn reliability_summary(repo: &dyn Repository, user: &User) -> Result<ReliabilitySummary> {
    let profile = professional_profile(repo, user).await?;
    Ok(ReliabilitySummary::new(
        profile.strikes,
        profile.completed_shifts,
    ))
}

/// Record the professional's RSA certificate
pub async fn save_rsa_certificate(
    repo: &dyn Repository,
    user: &User,
    certificate: RsaCertificate,
) -> Result<ProfessionalProfile> {
    log_op_start!("save_rsa_certificate", user_id = %user.id);
    let start = Instant::now();

    let result = save_rsa_certificate_impl(repo, user, certificate)
        .await
        .map_err(|e| {
            log_op_error!(
                "save_rsa_certificate",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "save_rsa_certificate",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

async fn save_rsa_certificate_impl(
    repo: &dyn Repository,
    user: &User,
    certificate: RsaCertificate,
) -> Result<ProfessionalProfile> {
    let number = certificate.number.trim();
    if number.is_empty() {
        return Err(HubError::InvalidInput {
            reason: "RSA certificate number cannot be empty".to_string(),
        }
        .into());
    }

    let mut profile = professional_profile(repo, user).await?;
    profile.rsa = Some(RsaCertificate {
        number: number.to_string(),
        expires_on: certificate.expires_on,
    });
    repo.upsert_professional_profile(&profile).await?;
    Ok(profile)
}
