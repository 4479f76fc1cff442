//! HTTP routes

pub mod auth;
pub mod conversations;
pub mod hub;
pub mod pages;
pub mod professional;
pub mod system;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::{http_span, request_id};
use crate::state::AppState;

fn api() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/config", get(system::client_config))
        .route("/api/navigation", get(system::navigation))
        .route("/api/auth/google", post(auth::google))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/role", post(auth::role))
        .route(
            "/api/hub/venue-profile",
            get(hub::venue_profile).put(hub::put_venue_profile),
        )
        .route("/api/hub/shifts", get(hub::shifts).post(hub::post_shift))
        .route("/api/hub/calendar", get(hub::calendar))
        .route(
            "/api/hub/applications/:id/status",
            post(hub::decide_application),
        )
        .route("/api/hub/applications/:id/strike", post(hub::strike))
        .route("/api/professional/profile", get(professional::profile))
        .route("/api/professional/rsa", put(professional::put_rsa))
        .route("/api/professional/reliability", get(professional::reliability))
        .route("/api/professional/shifts/:id/apply", post(professional::apply))
        .route(
            "/api/professional/applications/:id/updates",
            get(professional::application_updates),
        )
        .route(
            "/api/professional/applications/:id/withdraw",
            post(professional::withdraw),
        )
        .route("/api/conversations", post(conversations::start))
        .route("/api/test/setup-error-data", post(system::setup_test_data))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60))
}

/// The full application router
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/health", get(system::health))
        .merge(api());

    if let Some(dir) = &state.settings.static_dir {
        app = app.nest_service("/assets", ServeDir::new(dir.join("assets")));
    }

    app.fallback(pages::page)
        .layer(TraceLayer::new_for_http().make_span_with(http_span))
        .layer(cors())
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}
