use chrono::Utc;
use poem_openapi::{Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};

use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Whether the ranking source has connection settings
    pub ranking_source: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
}

/// Health API for liveness checks and monitoring tools.
pub struct Api {
    ranking_configured: bool,
}

impl Api {
    pub fn new(ranking_configured: bool) -> Self {
        Self { ranking_configured }
    }
}

#[OpenApi]
impl Api {
    /// Health check endpoint
    ///
    /// Returns the current status of the service. The ranking source is
    /// reported as `configured` or `unconfigured`; it is never contacted here,
    /// since recommendations keep working without it.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        let ranking_source = if self.ranking_configured {
            "configured"
        } else {
            "unconfigured"
        };

        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            ranking_source: ranking_source.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
