use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::catalog_item::errors::ItemError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

impl IntoErrorResponse for ItemError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            ItemError::NotFound => (StatusCode::NOT_FOUND, "NotFound", "item.not_found"),
            ItemError::InvalidId => (
                StatusCode::BAD_REQUEST,
                "ValidationError",
                "item.invalid_id",
            ),
            ItemError::Repository(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InternalError",
                "repository.persistence",
            ),
        };

        (status, Json(ErrorResponse::new(name, message)))
    }
}
