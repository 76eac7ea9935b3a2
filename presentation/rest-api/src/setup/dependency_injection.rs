use std::sync::Arc;

use anyhow::Context;

use graph::ranking_source::GraphRankingSource;
use logger::TracingLogger;
use persistence::catalog_item::repository::ItemRepositoryPostgres;

use business::application::catalog_item::get_by_id::GetItemByIdUseCaseImpl;
use business::application::recommendation::resolve::ResolveRecommendationsUseCaseImpl;
use business::domain::recommendation::services::RankingSource;

use crate::config::app_config::AppConfig;

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub item_api: crate::api::item::routes::ItemApi,
    pub recommendation_api: crate::api::recommendation::routes::RecommendationApi,
}

impl DependencyContainer {
    pub fn new(pool: sqlx::PgPool, config: &AppConfig) -> anyhow::Result<Self> {
        let logger = Arc::new(TracingLogger);

        // Infrastructure adapters
        let item_repository = Arc::new(ItemRepositoryPostgres::new(pool));
        let ranking_source = Arc::new(
            GraphRankingSource::http(config.graph.clone())
                .context("Failed to build graph ranking client")?,
        );
        let health_api = crate::api::health::routes::Api::new(ranking_source.is_configured());

        // Item use cases
        let get_item_by_id_use_case = Arc::new(GetItemByIdUseCaseImpl {
            repository: item_repository.clone(),
            logger: logger.clone(),
        });

        // Recommendation use cases
        let resolve_recommendations_use_case = Arc::new(ResolveRecommendationsUseCaseImpl {
            repository: item_repository,
            ranking_source,
            logger,
            settings: config.recommendations.settings(),
        });

        let item_api = crate::api::item::routes::ItemApi::new(get_item_by_id_use_case);

        let recommendation_api = crate::api::recommendation::routes::RecommendationApi::new(
            resolve_recommendations_use_case,
            config.recommendations.clone(),
        );

        Ok(Self {
            health_api,
            item_api,
            recommendation_api,
        })
    }
}
