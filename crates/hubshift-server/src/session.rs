//! Session extraction
//!
//! The token travels as `Authorization: Bearer <token>` or in the
//! `hubshift_session` cookie; the header wins when both are present.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use hubshift_core::errors::{ExErrorKind, HubError};
use hubshift_core::model::User;
use hubshift_core_types::Sensitive;
use hubshift_engine::commands::auth::resolve_session;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "hubshift_session";

/// Session token from the request, if any
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for a new session
///
/// `secure` adds the `Secure` attribute; browsers then only send the cookie
/// over HTTPS.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>, secure: bool) -> String {
    let max_age = (expires_at - Utc::now()).num_seconds().max(0);
    cookie_value(token, secure, max_age)
}

pub fn clear_session_cookie(secure: bool) -> String {
    cookie_value("", secure, 0)
}

fn cookie_value(token: &str, secure: bool, max_age: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax{}; Max-Age={}",
        SESSION_COOKIE,
        token,
        if secure { "; Secure" } else { "" },
        max_age
    )
}

/// Signed-in user; rejects the request with 401 otherwise
pub struct CurrentUser {
    pub user: User,
    pub token: Sensitive<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(HubError::NotAuthenticated)?;
        let user = resolve_session(state.repo.as_ref(), &token).await?;
        Ok(CurrentUser {
            user,
            token: Sensitive::new(token),
        })
    }
}

/// Signed-in user if the session is valid; anonymous otherwise
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };
        match resolve_session(state.repo.as_ref(), &token).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(e) if matches!(e.kind(), ExErrorKind::Unauthorised | ExErrorKind::SessionExpired) => {
                Ok(MaybeUser(None))
            }
            Err(e) => Err(e.into()),
        }
    }
}
