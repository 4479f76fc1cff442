//! Sign-in, sessions and role selection

use chrono::{DateTime, Duration, Utc};
use hubshift_core::errors::HubError;
use hubshift_core::model::{hash_token, normalize_email, AuthProvider, Role, Session, User};
use hubshift_core::routing::{dashboard_path, dashboard_redirect};
use hubshift_core::{log_op_end, log_op_error, log_op_start};
use hubshift_core_types::Sensitive;
use hubshift_store::errors::Result;
use hubshift_store::Repository;
use std::time::Instant;

use crate::identity::{IdentityVerifier, VerifiedIdentity};

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: User,
    /// Raw session token; only its hash is stored
    pub token: Sensitive<String>,
    pub expires_at: DateTime<Utc>,
    /// Where the client should go next
    pub redirect_to: &'static str,
    /// The account was created by this sign-in
    pub created: bool,
}

/// Sign in with a Google ID token
///
/// The user is matched by google id, then by email (linking the google id to
/// the existing account), and otherwise created. A role requested at sign-in
/// is applied when the account has no current role yet.
///
/// ## Errors
///
/// - `Unauthorised`: the credential was rejected
/// - `ExternalService`: Google could not be reached
/// - `Persistence`: database error
pub async fn google_sign_in(
    repo: &dyn Repository,
    verifier: &dyn IdentityVerifier,
    credential: &Sensitive<String>,
    requested_role: Option<Role>,
    session_ttl: Duration,
) -> Result<SignIn> {
    log_op_start!("google_sign_in");
    let start = Instant::now();

    let result = google_sign_in_impl(repo, verifier, credential, requested_role, session_ttl)
        .await
        .map_err(|e| {
            log_op_error!(
                "google_sign_in",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "google_sign_in",
        duration_ms = start.elapsed().as_millis() as u64,
        user_id = %result.user.id,
        created = result.created
    );

    Ok(result)
}

async fn google_sign_in_impl(
    repo: &dyn Repository,
    verifier: &dyn IdentityVerifier,
    credential: &Sensitive<String>,
    requested_role: Option<Role>,
    session_ttl: Duration,
) -> Result<SignIn> {
    let identity = verifier.verify(credential.expose()).await?;
    let (mut user, created) = find_or_create_google_user(repo, &identity, requested_role).await?;

    if !created && !user.has_selected_role() {
        if let Some(role) = requested_role {
            user.select_role(role);
            repo.update_user(&user).await?;
        }
    }

    let (session, token) = Session::issue(user.id, session_ttl);
    repo.insert_session(&session).await?;

    Ok(SignIn {
        redirect_to: dashboard_redirect(Some(&user)),
        expires_at: session.expires_at,
        user,
        token,
        created,
    })
}

async fn find_or_create_google_user(
    repo: &dyn Repository,
    identity: &VerifiedIdentity,
    requested_role: Option<Role>,
) -> Result<(User, bool)> {
    if let Some(user) = repo.find_user_by_google_id(&identity.subject).await? {
        return Ok((user, false));
    }

    let email = normalize_email(&identity.email);
    if let Some(mut user) = repo.find_user_by_email(&email).await? {
        tracing::debug!(user_id = %user.id, "linking google account to existing user");
        user.google_id = Some(identity.subject.clone());
        if user.display_name.is_none() {
            user.display_name = identity.name.clone();
        }
        user.updated_at = Utc::now();
        repo.update_user(&user).await?;
        return Ok((user, false));
    }

    let mut user = User::new(&email, AuthProvider::Google);
    user.google_id = Some(identity.subject.clone());
    user.display_name = identity.name.clone();
    if let Some(role) = requested_role {
        user.select_role(role);
    }
    repo.insert_user(&user).await?;
    Ok((user, true))
}

/// Resolve a raw session token to its user
///
/// Expired sessions are deleted on sight.
///
/// ## Errors
///
/// - `Unauthorised`: unknown token or deleted user
/// - `SessionExpired`: the session has expired
pub async fn resolve_session(repo: &dyn Repository, token: &str) -> Result<User> {
    let token_hash = hash_token(token);
    let session = repo
        .find_session(&token_hash)
        .await?
        .ok_or(HubError::NotAuthenticated)?;

    if session.is_expired(Utc::now()) {
        tracing::debug!(user_id = %session.user_id, "session expired");
        repo.delete_session(&token_hash).await?;
        return Err(HubError::SessionExpired.into());
    }

    let user = repo
        .find_user(session.user_id)
        .await?
        .ok_or(HubError::NotAuthenticated)?;
    Ok(user)
}

/// End the session for `token`; unknown tokens are ignored
pub async fn sign_out(repo: &dyn Repository, token: &str) -> Result<()> {
    log_op_start!("sign_out");
    let start = Instant::now();

    repo.delete_session(&hash_token(token)).await.map_err(|e| {
        log_op_error!(
            "sign_out",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!("sign_out", duration_ms = start.elapsed().as_millis() as u64);
    Ok(())
}

/// Switch the role the user is acting as
///
/// Returns the updated user and the dashboard for the new role.
pub async fn select_role(
    repo: &dyn Repository,
    user: &User,
    role: Role,
) -> Result<(User, &'static str)> {
    log_op_start!("select_role", user_id = %user.id, role = role.as_str());
    let start = Instant::now();

    let mut updated = user.clone();
    updated.select_role(role);
    repo.update_user(&updated).await.map_err(|e| {
        log_op_error!(
            "select_role",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "select_role",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok((updated, dashboard_path(role)))
}
