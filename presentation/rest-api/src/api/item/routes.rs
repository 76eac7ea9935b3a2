use std::sync::Arc;

use poem_openapi::{OpenApi, param::Path, payload::Json};

use business::domain::catalog_item::errors::ItemError;
use business::domain::catalog_item::use_cases::get_by_id::{GetItemByIdParams, GetItemByIdUseCase};
use business::domain::catalog_item::value_objects::ItemId;

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::item::dto::ItemResponse;
use crate::api::tags::ApiTags;

pub struct ItemApi {
    get_by_id_use_case: Arc<dyn GetItemByIdUseCase>,
}

impl ItemApi {
    pub fn new(get_by_id_use_case: Arc<dyn GetItemByIdUseCase>) -> Self {
        Self { get_by_id_use_case }
    }
}

/// Catalog item API
///
/// Read-only access to canonical catalog records.
#[OpenApi]
impl ItemApi {
    /// Get an item by ID
    ///
    /// Returns the canonical record for a catalog item.
    #[oai(path = "/items/:id", method = "get", tag = "ApiTags::Items")]
    async fn get_item_by_id(&self, id: Path<String>) -> GetItemByIdResponse {
        let id = match id.0.parse::<ItemId>() {
            Ok(id) => id,
            Err(err) => {
                let (_, json) = err.into_error_response();
                return GetItemByIdResponse::BadRequest(json);
            }
        };

        match self
            .get_by_id_use_case
            .execute(GetItemByIdParams { id })
            .await
        {
            Ok(item) => GetItemByIdResponse::Ok(Json(item.into())),
            Err(err @ ItemError::NotFound) => {
                let (_, json) = err.into_error_response();
                GetItemByIdResponse::NotFound(json)
            }
            Err(err) => {
                let (_, json) = err.into_error_response();
                GetItemByIdResponse::InternalError(json)
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetItemByIdResponse {
    #[oai(status = 200)]
    Ok(Json<ItemResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}
