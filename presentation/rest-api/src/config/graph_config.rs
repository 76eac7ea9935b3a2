use std::env;
use std::time::Duration;

use graph::config::{DEFAULT_DATABASE, DEFAULT_MIN_SCORE, DEFAULT_QUERY_TIMEOUT, GraphConfig};

use super::env_or;

/// Load ranking source settings from environment variables
///
/// Environment variables:
/// - GRAPH_URI: HTTP endpoint of the graph database, e.g. "http://localhost:7474"
/// - GRAPH_USER / GRAPH_PASSWORD: Basic auth credentials
/// - GRAPH_DATABASE: Database name (default: "neo4j")
/// - GRAPH_QUERY_TIMEOUT_MS: Budget for opening a session and running the query (default: 1500)
/// - GRAPH_MIN_SCORE: Minimum relevance for a candidate (default: 1)
///
/// Missing connection values are not an error: the ranking source stays
/// unconfigured and every request is served from the record store.
pub fn from_env() -> GraphConfig {
    let default_timeout_ms = u64::try_from(DEFAULT_QUERY_TIMEOUT.as_millis()).unwrap_or(1500);

    let config = GraphConfig {
        uri: env::var("GRAPH_URI").ok(),
        user: env::var("GRAPH_USER").ok(),
        password: env::var("GRAPH_PASSWORD").ok(),
        database: env::var("GRAPH_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
        query_timeout: Duration::from_millis(env_or("GRAPH_QUERY_TIMEOUT_MS", default_timeout_ms)),
        min_score: env_or("GRAPH_MIN_SCORE", DEFAULT_MIN_SCORE),
    };

    if !config.is_configured() {
        tracing::info!("Ranking source not configured, recommendations use ranking score order");
    }

    config
}
