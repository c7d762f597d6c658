//! API error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use triage_core::{DispatchError, IntakeError, RosterError};

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail, "API internal error");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::NotFound(_) => ApiError::NotFound(err.to_string()),
            RosterError::Validation(_) => ApiError::BadRequest(err.to_string()),
            RosterError::Database(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IntakeError::Validation(_) => ApiError::BadRequest(err.to_string()),
            IntakeError::InvalidState { .. } => ApiError::Conflict(err.to_string()),
            IntakeError::Database(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Roster(e) => e.into(),
            DispatchError::Intake(e) => e.into(),
            DispatchError::Precondition(_) => ApiError::Unprocessable(err.to_string()),
            DispatchError::LockPoisoned => ApiError::Internal(err.to_string()),
        }
    }
}
