//! Page navigations
//!
//! Every non-API path runs through the route guard first. A redirect is
//! answered with 303; otherwise the SPA shell is served and the client
//! renders the page.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use hubshift_core::routing::{evaluate, GuardDecision, Location, SessionState};
use std::sync::Arc;

use crate::error::ApiError;
use crate::session::MaybeUser;
use crate::state::AppState;

const FALLBACK_SHELL: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>HubShift</title>
  </head>
  <body>
    <div id="root"></div>
  </body>
</html>
"#;

pub async fn page(
    method: Method,
    uri: Uri,
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return ApiError::not_found(format!("No route for {} {}", method, path)).into_response();
    }
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let raw = uri.path_and_query().map_or(path, |pq| pq.as_str());
    let location = Location::parse(raw);
    let requirement = state.routes.lookup(&location.path);

    match evaluate(
        SessionState::from_parts(user.as_ref(), false),
        &location,
        &requirement,
    ) {
        GuardDecision::Redirect(redirect) => Redirect::to(&redirect.location()).into_response(),
        GuardDecision::Render | GuardDecision::Pending => Html(shell(&state).await).into_response(),
    }
}

async fn shell(state: &AppState) -> String {
    let Some(dir) = &state.settings.static_dir else {
        return FALLBACK_SHELL.to_string();
    };
    let index = dir.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(path = %index.display(), error = %e, "cannot read SPA index");
            FALLBACK_SHELL.to_string()
        }
    }
}
