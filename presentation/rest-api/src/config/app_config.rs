use super::{
    cors_config, graph_config, recommendation_config::RecommendationConfig,
    server_config::ServerConfig,
};
use graph::config::GraphConfig;
use poem::middleware::Cors;

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
    pub graph: GraphConfig,
    pub recommendations: RecommendationConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
            graph: graph_config::from_env(),
            recommendations: RecommendationConfig::from_env(),
        }
    }
}
