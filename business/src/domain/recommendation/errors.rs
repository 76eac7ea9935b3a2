/// Errors surfaced to callers of the recommendation use case.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("recommendation.invalid_request")]
    InvalidRequest,
    #[error("recommendation.record_store_unavailable")]
    RecordStoreUnavailable,
}

/// Failures of the ranking source. Always recovered by the resolver.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("ranking.not_configured")]
    NotConfigured,
    #[error("ranking.connection")]
    Connection,
    #[error("ranking.authentication")]
    Authentication,
    #[error("ranking.query")]
    Query,
    #[error("ranking.timeout")]
    Timeout,
}
