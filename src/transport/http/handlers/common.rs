use crate::error::{ServiceError, ValidationError};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

/// Message returned to clients for store failures. Details stay in the log.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Maps service errors to HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self(ServiceError::Validation(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::Validation(e) => {
                warn!(target: "api", "rejected request: {}", e);
                (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string()))).into_response()
            }
            ServiceError::Store(e) => {
                error!(target: "api", "store failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::err(INTERNAL_ERROR_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}
