//! HTTP error responses
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}` with a
//! status derived from the error kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hubshift_core::errors::{ExError, ExErrorKind, HubError};
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(ExError);

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self(ExError::new(ExErrorKind::NotFound).with_message(what))
    }

    pub fn inner(&self) -> &ExError {
        &self.0
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        Self(err)
    }
}

impl From<HubError> for ApiError {
    fn from(err: HubError) -> Self {
        Self(err.into())
    }
}

pub fn status_for(kind: ExErrorKind) -> StatusCode {
    match kind {
        ExErrorKind::InvalidInput | ExErrorKind::InvalidRole | ExErrorKind::InvalidTimeRange => {
            StatusCode::BAD_REQUEST
        }
        ExErrorKind::Unauthorised | ExErrorKind::SessionExpired => StatusCode::UNAUTHORIZED,
        ExErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ExErrorKind::NotFound => StatusCode::NOT_FOUND,
        ExErrorKind::AlreadyExists | ExErrorKind::Conflict => StatusCode::CONFLICT,
        ExErrorKind::ComplianceViolation | ExErrorKind::ShiftNotOpen => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ExErrorKind::ExternalService => StatusCode::BAD_GATEWAY,
        ExErrorKind::Persistence
        | ExErrorKind::Migration
        | ExErrorKind::Serialization
        | ExErrorKind::Configuration
        | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());

        // Server-side detail stays in the logs
        let message = if status.is_server_error() {
            tracing::error!(
                err_code = self.0.code(),
                op = self.0.op().unwrap_or("unknown"),
                error = %self.0,
                "request failed"
            );
            match self.0.kind() {
                ExErrorKind::ExternalService => self.0.message().to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.message().to_string()
        };

        let body = json!({
            "error": {
                "code": self.0.code(),
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ExErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ExErrorKind::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ExErrorKind::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ExErrorKind::AlreadyExists), StatusCode::CONFLICT);
        assert_eq!(
            status_for(ExErrorKind::ComplianceViolation),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_for(ExErrorKind::ExternalService), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(ExErrorKind::Persistence),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let err = ApiError::from(
            ExError::new(ExErrorKind::Persistence).with_message("connection reset by peer"),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_domain_error_keeps_message() {
        let err = ApiError::from(HubError::SelfConversation);
        assert_eq!(err.inner().kind(), ExErrorKind::InvalidInput);
        assert_eq!(
            err.into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
