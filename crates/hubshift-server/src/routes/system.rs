//! Health, client config, navigation decisions and test fixtures

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hubshift_core::routing::{evaluate, GuardDecision, Location, SessionState};
use hubshift_engine::commands::fixtures::setup_error_data;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::MaybeUser;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.repo.ping().await {
        Ok(()) => Json(json!({ "status": "ok", "database": "ok" })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unreachable" })),
            )
                .into_response()
        }
    }
}

pub async fn client_config(State(state): State<Arc<AppState>>) -> Json<ClientConfig> {
    Json(state.settings.client_config())
}

#[derive(Deserialize)]
pub struct NavigationQuery {
    pub path: String,
}

#[derive(Serialize)]
pub struct NavigationResponse {
    #[serde(flatten)]
    pub decision: GuardDecision,
    /// Full redirect target, `from` included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Guard decision for a client-side navigation
pub async fn navigation(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let location = Location::parse(&query.path);
    let requirement = state.routes.lookup(&location.path);
    let decision = evaluate(
        SessionState::from_parts(user.as_ref(), false),
        &location,
        &requirement,
    );
    let redirect_location = match &decision {
        GuardDecision::Redirect(redirect) => Some(redirect.location()),
        _ => None,
    };
    Json(NavigationResponse {
        decision,
        location: redirect_location,
    })
}

pub async fn setup_test_data(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.settings.enable_test_endpoints {
        return Err(ApiError::not_found("Not found"));
    }
    let fixtures = setup_error_data(state.repo.as_ref(), state.settings.session_ttl()).await?;
    Ok((StatusCode::CREATED, Json(fixtures)))
}
