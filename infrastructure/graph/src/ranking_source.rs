use async_trait::async_trait;
use tokio::time::{Instant, timeout_at};

use business::domain::recommendation::errors::RankingError;
use business::domain::recommendation::model::Candidate;
use business::domain::recommendation::services::RankingSource;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::http_session::HttpSessionOpener;
use crate::session::{SessionGuard, SessionOpener};

/// Ranking source backed by a graph database.
///
/// Opens one session per query and bounds acquisition plus execution by
/// `GraphConfig::query_timeout`.
pub struct GraphRankingSource<O: SessionOpener> {
    opener: O,
    config: GraphConfig,
}

impl GraphRankingSource<HttpSessionOpener> {
    pub fn http(config: GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::new(HttpSessionOpener::new(config.clone())?, config))
    }
}

impl<O: SessionOpener> GraphRankingSource<O> {
    pub fn new(opener: O, config: GraphConfig) -> Self {
        Self { opener, config }
    }
}

#[async_trait]
impl<O: SessionOpener> RankingSource for GraphRankingSource<O> {
    fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn top_candidates(&self, limit: usize) -> Result<Vec<Candidate>, RankingError> {
        if !self.config.is_configured() {
            return Err(RankingError::NotConfigured);
        }

        let deadline = Instant::now() + self.config.query_timeout;

        let session = timeout_at(deadline, self.opener.open())
            .await
            .map_err(|_| {
                tracing::warn!("Timed out opening ranking session");
                RankingError::Timeout
            })?
            .map_err(|err| {
                tracing::warn!("Failed to open ranking session: {}", err);
                RankingError::from(err)
            })?;

        let guard = SessionGuard::new(session);
        let rows = timeout_at(
            deadline,
            guard.run_top_candidates(limit, self.config.min_score),
        )
        .await;
        guard.release().await;

        let ids = rows
            .map_err(|_| {
                tracing::warn!("Ranking query timed out");
                RankingError::Timeout
            })?
            .map_err(|err| {
                tracing::warn!("Ranking query failed: {}", err);
                RankingError::from(err)
            })?;

        Ok(ids.into_iter().map(Candidate::new).collect())
    }
}
