//! Seed data for end-to-end error scenarios
//!
//! Each call creates a fresh, independent set of accounts so runs do not
//! collide. The server only exposes this behind its test-endpoint switch.

use chrono::{Duration, NaiveTime, Utc};
use hubshift_core::model::{
    AuthProvider, NewShift, ProfessionalProfile, Role, RsaCertificate, Session, Shift,
    ShiftStatus, User,
};
use hubshift_core::reliability::SUSPENSION_STRIKES;
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use serde::Serialize;
use std::time::Instant;
use uuid::Uuid;

/// A seeded account and a session token for driving it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureAccount {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorFixtures {
    pub hub: FixtureAccount,
    /// Has no RSA certificate
    pub uncertified: FixtureAccount,
    /// RSA certificate expired before the RSA shift
    pub expired_rsa: FixtureAccount,
    /// At the strike limit
    pub suspended: FixtureAccount,
    /// A role has never been selected
    pub no_role: FixtureAccount,
    pub rsa_shift_id: Uuid,
    pub filled_shift_id: Uuid,
}

pub async fn setup_error_data(repo: &dyn Repository, session_ttl: Duration) -> Result<ErrorFixtures> {
    log_op_start!("setup_error_data");
    let start = Instant::now();

    let result = setup_error_data_impl(repo, session_ttl)
        .await
        .map_err(|e| {
            log_op_error!(
                "setup_error_data",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "setup_error_data",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

async fn setup_error_data_impl(
    repo: &dyn Repository,
    session_ttl: Duration,
) -> Result<ErrorFixtures> {
    let run = Uuid::new_v4().simple().to_string();
    let run = &run[..8];
    let shift_date = Utc::now().date_naive() + Duration::days(7);

    let hub = account(repo, &format!("hub-{}", run), Some(Role::Hub), session_ttl).await?;
    let uncertified = account(
        repo,
        &format!("uncertified-{}", run),
        Some(Role::Professional),
        session_ttl,
    )
    .await?;
    let expired_rsa = account(
        repo,
        &format!("expired-rsa-{}", run),
        Some(Role::Professional),
        session_ttl,
    )
    .await?;
    let suspended = account(
        repo,
        &format!("suspended-{}", run),
        Some(Role::Professional),
        session_ttl,
    )
    .await?;
    let no_role = account(repo, &format!("no-role-{}", run), None, session_ttl).await?;

    let mut expired = ProfessionalProfile::new(expired_rsa.user_id);
    expired.rsa = Some(RsaCertificate {
        number: format!("RSA-EXPIRED-{}", run),
        expires_on: shift_date - Duration::days(30),
    });
    repo.upsert_professional_profile(&expired).await?;

    let mut struck_out = ProfessionalProfile::new(suspended.user_id);
    struck_out.strikes = SUSPENSION_STRIKES;
    struck_out.rsa = Some(RsaCertificate {
        number: format!("RSA-VALID-{}", run),
        expires_on: shift_date + Duration::days(365),
    });
    repo.upsert_professional_profile(&struck_out).await?;

    let rsa_shift = fixture_shift(hub.user_id, "Bartender (RSA)", shift_date, true)?;
    repo.insert_shift(&rsa_shift).await?;

    let filled_shift = fixture_shift(hub.user_id, "Barista", shift_date, false)?;
    repo.insert_shift(&filled_shift).await?;
    repo.update_shift_status(filled_shift.id, ShiftStatus::Filled)
        .await?;

    Ok(ErrorFixtures {
        hub,
        uncertified,
        expired_rsa,
        suspended,
        no_role,
        rsa_shift_id: rsa_shift.id,
        filled_shift_id: filled_shift.id,
    })
}

async fn account(
    repo: &dyn Repository,
    name: &str,
    role: Option<Role>,
    session_ttl: Duration,
) -> Result<FixtureAccount> {
    let mut user = User::new(&format!("{}@hubshift.test", name), AuthProvider::Email);
    if let Some(role) = role {
        user.select_role(role);
    }
    repo.insert_user(&user).await?;

    let (session, token) = Session::issue(user.id, session_ttl);
    repo.insert_session(&session).await?;

    Ok(FixtureAccount {
        user_id: user.id,
        email: user.email,
        token: token.into_inner(),
    })
}

fn fixture_shift(
    hub_id: Uuid,
    title: &str,
    date: chrono::NaiveDate,
    requires_rsa: bool,
) -> Result<Shift> {
    let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
    Ok(Shift::from_new(
        hub_id,
        NewShift {
            title: title.to_string(),
            date,
            start_time: at(18),
            end_time: at(23),
            hourly_rate_cents: 3500,
            requires_rsa,
        },
    )?)
}
