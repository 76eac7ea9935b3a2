use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::recommendation::errors::RecommendationError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for RecommendationError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            RecommendationError::InvalidRequest => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "recommendation.invalid_request",
            ),
            RecommendationError::RecordStoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UnavailableError",
                "recommendation.record_store_unavailable",
            ),
        };

        (status, Json(ErrorResponse::new(name, message)))
    }
}
