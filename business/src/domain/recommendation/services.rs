use async_trait::async_trait;

use super::errors::RankingError;
use super::model::Candidate;

/// Service port for the optional relationship-ranking backend.
///
/// Callers never need to know whether the backend is reachable: every failure
/// comes back as a [`RankingError`].
#[async_trait]
pub trait RankingSource: Send + Sync {
    /// Whether connection settings are present. Performs no I/O.
    fn is_configured(&self) -> bool;

    /// Up to `limit` candidates, most relevant first. The limit is applied by
    /// the backend and any session opened for the query is closed before this
    /// returns.
    async fn top_candidates(&self, limit: usize) -> Result<Vec<Candidate>, RankingError>;
}
