use crate::domain::catalog_item::model::Item;

use super::errors::{RankingError, RecommendationError};

/// Identifier emitted by the ranking source, most relevant first.
///
/// A candidate only points at an item; it is never shown in place of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A validated request for at most `limit` recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationRequest {
    limit: usize,
}

impl RecommendationRequest {
    pub fn new(limit: i64) -> Result<Self, RecommendationError> {
        if limit <= 0 {
            return Err(RecommendationError::InvalidRequest);
        }
        let limit = usize::try_from(limit).map_err(|_| RecommendationError::InvalidRequest)?;
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Which resolution path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Ranking,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Ranking => write!(f, "ranking"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

/// Why the ranking path was abandoned for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    Unconfigured,
    RankingUnavailable(RankingError),
    RankingEmpty,
    Unresolved,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::Unconfigured => write!(f, "ranking source not configured"),
            FallbackReason::RankingUnavailable(err) => {
                write!(f, "ranking source unavailable ({})", err)
            }
            FallbackReason::RankingEmpty => write!(f, "ranking source returned no candidates"),
            FallbackReason::Unresolved => {
                write!(f, "no candidate resolved to a record")
            }
        }
    }
}

/// Ordered recommendations with unique ids, never longer than the request limit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    pub items: Vec<Item>,
    pub provenance: Provenance,
}
