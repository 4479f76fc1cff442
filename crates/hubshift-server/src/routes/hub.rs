//! Hub endpoints: venue profile, shifts, calendar, application decisions

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use hubshift_core::calendar::DayWindow;
use hubshift_core::model::{Application, ApplicationStatus, NewShift, Shift, VenueProfile};
use hubshift_core::reliability::ReliabilitySummary;
use hubshift_engine::commands::applications::{issue_strike, update_application_status};
use hubshift_engine::commands::shifts::{calendar_day, create_shift, list_shifts, CalendarDay};
use hubshift_engine::commands::venue::{get_venue_profile, save_venue_profile, VenueProfileInput};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

pub async fn venue_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<VenueProfile>, ApiError> {
    Ok(Json(
        get_venue_profile(state.repo.as_ref(), &current.user).await?,
    ))
}

pub async fn put_venue_profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(input): Json<VenueProfileInput>,
) -> Result<Json<VenueProfile>, ApiError> {
    Ok(Json(
        save_venue_profile(state.repo.as_ref(), &current.user, input).await?,
    ))
}

#[derive(Deserialize)]
pub struct ShiftQuery {
    pub date: Option<NaiveDate>,
}

pub async fn shifts(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<ShiftQuery>,
) -> Result<Json<Vec<Shift>>, ApiError> {
    Ok(Json(
        list_shifts(state.repo.as_ref(), &current.user, query.date).await?,
    ))
}

pub async fn post_shift(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(new): Json<NewShift>,
) -> Result<impl IntoResponse, ApiError> {
    let shift = create_shift(state.repo.as_ref(), &current.user, new).await?;
    Ok((StatusCode::CREATED, Json(shift)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub date: NaiveDate,
    pub day_start: Option<NaiveTime>,
    pub day_end: Option<NaiveTime>,
    pub height: Option<f64>,
    /// Client's local time; server local time when absent
    pub now: Option<NaiveDateTime>,
}

pub async fn calendar(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarDay>, ApiError> {
    let defaults = DayWindow::default();
    let window = DayWindow::new(
        query.day_start.unwrap_or(defaults.day_start()),
        query.day_end.unwrap_or(defaults.day_end()),
        query.height.unwrap_or(defaults.height()),
    )?;
    let now = query.now.unwrap_or_else(|| Local::now().naive_local());

    let day = calendar_day(
        state.repo.as_ref(),
        &current.user,
        query.date,
        window,
        Some((now.date(), now.time())),
    )
    .await?;
    Ok(Json(day))
}

#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: ApplicationStatus,
}

pub async fn decide_application(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(application_id): Path<Uuid>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<Application>, ApiError> {
    let application = update_application_status(
        state.repo.as_ref(),
        &current.user,
        application_id,
        request.status,
    )
    .await?;
    Ok(Json(application))
}

#[derive(Deserialize)]
pub struct StrikeRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

pub async fn strike(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(application_id): Path<Uuid>,
    Json(request): Json<StrikeRequest>,
) -> Result<Json<ReliabilitySummary>, ApiError> {
    let summary = issue_strike(
        state.repo.as_ref(),
        &current.user,
        application_id,
        request.reason,
    )
    .await?;
    Ok(Json(summary))
}
