use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hubshift_engine::commands::conversations::start_conversation;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationRequest {
    pub other_user_id: Uuid,
    #[serde(default)]
    pub shift_id: Option<Uuid>,
}

/// 201 for a new conversation, 200 when an existing one is reused
pub async fn start(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(request): Json<StartConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (conversation, created) = start_conversation(
        state.repo.as_ref(),
        &current.user,
        request.other_user_id,
        request.shift_id,
    )
    .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(conversation)))
}
