//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::{ApiFailure, ApiResponse, FailureKind};
use crate::report::ThresholdError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Input rejected before any remote call
    #[error("{0}")]
    Validation(String),

    // Collaborator errors
    #[error(transparent)]
    Upstream(#[from] ApiFailure),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(failure) => match failure.kind {
                FailureKind::Validation => StatusCode::BAD_REQUEST,
                FailureKind::Transport => StatusCode::BAD_GATEWAY,
                // Pass collaborator client errors through; anything else is a gateway fault
                FailureKind::Application => failure
                    .status
                    .and_then(|s| StatusCode::from_u16(s).ok())
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Upstream(failure) => {
                tracing::warn!(kind = ?failure.kind, status = ?failure.status, "Upstream error: {}", failure.message);
                failure.message.clone()
            }
            AppError::Validation(msg) => msg.clone(),
        };

        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<ThresholdError> for AppError {
    fn from(err: ThresholdError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(ApiFailure::transport("down")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(ApiFailure::application(401, "bad credentials")).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(ApiFailure::application(503, "busy")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(ThresholdError::NotANumber).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_response_carries_status() {
        let response = AppError::from(ApiFailure::application(401, "bad credentials")).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
