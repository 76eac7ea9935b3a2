use business::domain::recommendation::errors::RankingError;

/// Transport-level failures of the graph backend, with enough detail to log.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("graph.not_configured")]
    NotConfigured,
    #[error("graph.connection: {0}")]
    Connection(String),
    #[error("graph.authentication: status {0}")]
    Authentication(u16),
    #[error("graph.query: {0}")]
    Query(String),
}

impl From<GraphError> for RankingError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotConfigured => RankingError::NotConfigured,
            GraphError::Connection(_) => RankingError::Connection,
            GraphError::Authentication(_) => RankingError::Authentication,
            GraphError::Query(_) => RankingError::Query,
        }
    }
}
