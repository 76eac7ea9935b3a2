use std::time::Duration;

use business::application::recommendation::resolve::RecommendationSettings;

use super::env_or;

/// Recommendation endpoint settings
#[derive(Debug, Clone)]
pub struct RecommendationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
    pub ranking_timeout: Duration,
    pub fallback_timeout: Duration,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            default_limit: 8,
            max_limit: 50,
            ranking_timeout: Duration::from_millis(2000),
            fallback_timeout: Duration::from_millis(5000),
        }
    }
}

impl RecommendationConfig {
    /// Load recommendation settings from environment variables
    ///
    /// Environment variables:
    /// - RECOMMENDATION_DEFAULT_LIMIT: Limit used when the caller omits one (default: 8)
    /// - RECOMMENDATION_MAX_LIMIT: Upper bound applied to caller limits (default: 50)
    /// - RECOMMENDATION_RANKING_TIMEOUT_MS: Overall ranking budget (default: 2000)
    /// - RECOMMENDATION_FALLBACK_TIMEOUT_MS: Record store budget on fallback (default: 5000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            default_limit: env_or("RECOMMENDATION_DEFAULT_LIMIT", defaults.default_limit),
            max_limit: env_or("RECOMMENDATION_MAX_LIMIT", defaults.max_limit),
            ranking_timeout: env_millis(
                "RECOMMENDATION_RANKING_TIMEOUT_MS",
                defaults.ranking_timeout,
            ),
            fallback_timeout: env_millis(
                "RECOMMENDATION_FALLBACK_TIMEOUT_MS",
                defaults.fallback_timeout,
            ),
        };

        if config.ranking_timeout >= config.fallback_timeout {
            tracing::warn!(
                "Ranking timeout {:?} is not below fallback timeout {:?}",
                config.ranking_timeout,
                config.fallback_timeout
            );
        }

        config
    }

    /// Applies the default to a missing limit and caps it at `max_limit`.
    /// Non-positive limits pass through so the use case can reject them.
    pub fn effective_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_limit)
            .min(self.max_limit)
    }

    pub fn settings(&self) -> RecommendationSettings {
        RecommendationSettings {
            ranking_timeout: self.ranking_timeout,
            fallback_timeout: self.fallback_timeout,
        }
    }
}

fn env_millis(key: &str, default: Duration) -> Duration {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    Duration::from_millis(env_or(key, default_ms))
}
