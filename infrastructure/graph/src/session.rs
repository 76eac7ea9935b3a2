use async_trait::async_trait;

use crate::error::GraphError;

/// A scoped session against the graph backend.
#[async_trait]
pub trait RankingSession: Send + Sync {
    /// Runs the ranking statement and returns candidate ids, most relevant first.
    async fn run_top_candidates(
        &self,
        limit: usize,
        min_score: i64,
    ) -> Result<Vec<String>, GraphError>;

    async fn close(&self) -> Result<(), GraphError>;
}

/// Opens sessions against the graph backend.
#[async_trait]
pub trait SessionOpener: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RankingSession>, GraphError>;
}

/// Owns an open session and closes it exactly once.
///
/// `release` runs the close on its own task and waits for it, so cancelling
/// the caller mid-close leaves the close running to completion. A guard
/// dropped without being released (the owning future was cancelled or
/// panicked) hands the close to the current tokio runtime.
pub struct SessionGuard {
    session: Option<Box<dyn RankingSession>>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn RankingSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub async fn run_top_candidates(
        &self,
        limit: usize,
        min_score: i64,
    ) -> Result<Vec<String>, GraphError> {
        match &self.session {
            Some(session) => session.run_top_candidates(limit, min_score).await,
            None => Err(GraphError::Connection("session already released".to_string())),
        }
    }

    pub async fn release(mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Err(err) = tokio::spawn(close_session(session)).await {
            tracing::warn!("Ranking session close task failed: {}", err);
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(close_session(session));
            }
            Err(_) => {
                tracing::warn!("Ranking session dropped outside a runtime; left to expire");
            }
        }
    }
}

async fn close_session(session: Box<dyn RankingSession>) {
    if let Err(err) = session.close().await {
        tracing::warn!("Failed to close ranking session: {}", err);
    }
}
