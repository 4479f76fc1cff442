//! Professional endpoints: applying, timelines, reliability, RSA

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hubshift_core::model::{Application, ApplicationStatus, ProfessionalProfile, RsaCertificate};
use hubshift_core::reliability::ReliabilitySummary;
use hubshift_engine::commands::applications::{
    apply_to_shift, list_application_updates, update_application_status, ApplicationUpdateView,
};
use hubshift_engine::commands::professional::{
    professional_profile, reliability_summary, save_rsa_certificate,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

pub async fn apply(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(shift_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let application = apply_to_shift(state.repo.as_ref(), &current.user, shift_id).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn withdraw(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
    let application = update_application_status(
        state.repo.as_ref(),
        &current.user,
        application_id,
        ApplicationStatus::Withdrawn,
    )
    .await?;
    Ok(Json(application))
}

pub async fn application_updates(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationUpdateView>>, ApiError> {
    let updates =
        list_application_updates(state.repo.as_ref(), &current.user, application_id).await?;
    Ok(Json(updates))
}

pub async fn reliability(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<ReliabilitySummary>, ApiError> {
    Ok(Json(
        reliability_summary(state.repo.as_ref(), &current.user).await?,
    ))
}

pub async fn profile(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> Result<Json<ProfessionalProfile>, ApiError> {
    Ok(Json(
        professional_profile(state.repo.as_ref(), &current.user).await?,
    ))
}

pub async fn put_rsa(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(certificate): Json<RsaCertificate>,
) -> Result<Json<ProfessionalProfile>, ApiError> {
    Ok(Json(
        save_rsa_certificate(state.repo.as_ref(), &current.user, certificate).await?,
    ))
}
