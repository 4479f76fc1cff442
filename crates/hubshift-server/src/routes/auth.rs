//! Sign-in, sign-out and role selection

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use hubshift_core::model::{Role, User};
use hubshift_core::routing::dashboard_redirect;
use hubshift_core_types::Sensitive;
use hubshift_engine::commands::auth::{google_sign_in, select_role, sign_out};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::session::{clear_session_cookie, session_cookie, CurrentUser};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GoogleSignInRequest {
    /// ID token from Google Identity Services
    pub credential: Sensitive<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub redirect_to: &'static str,
    pub created: bool,
}

pub async fn google(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GoogleSignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let signed_in = google_sign_in(
        state.repo.as_ref(),
        state.verifier.as_ref(),
        &request.credential,
        request.role,
        state.settings.session_ttl(),
    )
    .await?;

    let cookie = session_cookie(
        signed_in.token.expose(),
        signed_in.expires_at,
        state.settings.secure_cookies,
    );
    let status = if signed_in.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    let body = SessionResponse {
        user: signed_in.user,
        token: signed_in.token.into_inner(),
        expires_at: signed_in.expires_at,
        redirect_to: signed_in.redirect_to,
        created: signed_in.created,
    };
    Ok((status, [(SET_COOKIE, cookie)], Json(body)))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    sign_out(state.repo.as_ref(), current.token.expose()).await?;
    let cookie = clear_session_cookie(state.settings.secure_cookies);
    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, cookie)]))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub dashboard: &'static str,
}

pub async fn me(current: CurrentUser) -> Json<MeResponse> {
    let dashboard = dashboard_redirect(Some(&current.user));
    Json(MeResponse {
        user: current.user,
        dashboard,
    })
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub user: User,
    pub redirect_to: &'static str,
}

pub async fn role(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(request): Json<RoleRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    let (user, redirect_to) = select_role(state.repo.as_ref(), &current.user, request.role).await?;
    Ok(Json(RoleResponse { user, redirect_to }))
}
