use std::sync::Arc;

use poem_openapi::{OpenApi, param::Query, payload::Json};

use business::domain::recommendation::errors::RecommendationError;
use business::domain::recommendation::use_cases::resolve::{
    ResolveRecommendationsParams, ResolveRecommendationsUseCase,
};

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::item::dto::ItemResponse;
use crate::api::tags::ApiTags;
use crate::config::recommendation_config::RecommendationConfig;

pub struct RecommendationApi {
    resolve_use_case: Arc<dyn ResolveRecommendationsUseCase>,
    config: RecommendationConfig,
}

impl RecommendationApi {
    pub fn new(
        resolve_use_case: Arc<dyn ResolveRecommendationsUseCase>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            resolve_use_case,
            config,
        }
    }
}

/// Recommendation API
///
/// Endpoints for listing recommended catalog items.
#[OpenApi]
impl RecommendationApi {
    /// List recommended items
    ///
    /// Returns items ranked by customer purchase relationships. When that
    /// ranking is unavailable, items are ordered by their ranking score
    /// instead. The body has the same shape either way; the
    /// `X-Recommendation-Source` header tells which ordering was used.
    #[oai(
        path = "/recommendations",
        method = "get",
        tag = "ApiTags::Recommendations"
    )]
    async fn get_recommendations(
        &self,
        /// Maximum number of items to return (default: 8, capped at 50)
        limit: Query<Option<i64>>,
    ) -> GetRecommendationsResponse {
        let limit = self.config.effective_limit(limit.0);

        match self
            .resolve_use_case
            .execute(ResolveRecommendationsParams { limit })
            .await
        {
            Ok(result) => {
                let items: Vec<ItemResponse> =
                    result.items.into_iter().map(|item| item.into()).collect();
                GetRecommendationsResponse::Ok(Json(items), result.provenance.to_string())
            }
            Err(err @ RecommendationError::InvalidRequest) => {
                let (_, json) = err.into_error_response();
                GetRecommendationsResponse::BadRequest(json)
            }
            Err(err) => {
                let (_, json) = err.into_error_response();
                GetRecommendationsResponse::ServiceUnavailable(json)
            }
        }
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum GetRecommendationsResponse {
    /// Recommended items, most relevant first
    #[oai(status = 200)]
    Ok(
        Json<Vec<ItemResponse>>,
        /// Ordering that produced the list: `ranking` or `fallback`
        #[oai(header = "X-Recommendation-Source")]
        String,
    ),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[oai(status = 503)]
    ServiceUnavailable(Json<ErrorResponse>),
}
