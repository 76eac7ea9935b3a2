use async_trait::async_trait;

use crate::domain::recommendation::errors::RecommendationError;
use crate::domain::recommendation::model::RecommendationResult;

pub struct ResolveRecommendationsParams {
    pub limit: i64,
}

#[async_trait]
pub trait ResolveRecommendationsUseCase: Send + Sync {
    async fn execute(
        &self,
        params: ResolveRecommendationsParams,
    ) -> Result<RecommendationResult, RecommendationError>;
}
