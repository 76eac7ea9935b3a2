use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::catalog_item::model::Item;
use crate::domain::catalog_item::repository::ItemRepository;
use crate::domain::catalog_item::value_objects::{ItemId, SortAttribute};
use crate::domain::logger::Logger;
use crate::domain::recommendation::errors::{RankingError, RecommendationError};
use crate::domain::recommendation::model::{
    Candidate, FallbackReason, Provenance, RecommendationRequest, RecommendationResult,
};
use crate::domain::recommendation::services::RankingSource;
use crate::domain::recommendation::use_cases::resolve::{
    ResolveRecommendationsParams, ResolveRecommendationsUseCase,
};

/// Time budgets for the two resolution paths.
///
/// The ranking budget must stay below the fallback budget so a hung ranking
/// backend still leaves time for the record store.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationSettings {
    pub ranking_timeout: Duration,
    pub fallback_timeout: Duration,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            ranking_timeout: Duration::from_secs(2),
            fallback_timeout: Duration::from_secs(5),
        }
    }
}

pub struct ResolveRecommendationsUseCaseImpl {
    pub repository: Arc<dyn ItemRepository>,
    pub ranking_source: Arc<dyn RankingSource>,
    pub logger: Arc<dyn Logger>,
    pub settings: RecommendationSettings,
}

enum PrimaryOutcome {
    Served(Vec<Item>),
    Fallback(FallbackReason),
}

#[async_trait]
impl ResolveRecommendationsUseCase for ResolveRecommendationsUseCaseImpl {
    async fn execute(
        &self,
        params: ResolveRecommendationsParams,
    ) -> Result<RecommendationResult, RecommendationError> {
        let request = RecommendationRequest::new(params.limit)?;
        let limit = request.limit();

        self.logger
            .info(&format!("Resolving recommendations with limit: {}", limit));

        let reason = match self.resolve_primary(limit).await {
            PrimaryOutcome::Served(items) => {
                self.logger.info(&format!(
                    "Serving {} recommendations from ranking source",
                    items.len()
                ));
                return Ok(RecommendationResult {
                    items,
                    provenance: Provenance::Ranking,
                });
            }
            PrimaryOutcome::Fallback(reason) => reason,
        };

        self.log_fallback(&reason);
        let items = self.resolve_fallback(limit).await?;
        self.logger.info(&format!(
            "Serving {} recommendations from fallback ({})",
            items.len(),
            reason
        ));

        Ok(RecommendationResult {
            items,
            provenance: Provenance::Fallback,
        })
    }
}

impl ResolveRecommendationsUseCaseImpl {
    /// Decides whether the ranking path can serve the request. Every reason to
    /// degrade ends up as a `FallbackReason`.
    async fn resolve_primary(&self, limit: usize) -> PrimaryOutcome {
        if !self.ranking_source.is_configured() {
            return PrimaryOutcome::Fallback(FallbackReason::Unconfigured);
        }

        let candidates = match tokio::time::timeout(
            self.settings.ranking_timeout,
            self.ranking_source.top_candidates(limit),
        )
        .await
        {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(err)) => {
                return PrimaryOutcome::Fallback(FallbackReason::RankingUnavailable(err));
            }
            Err(_) => {
                return PrimaryOutcome::Fallback(FallbackReason::RankingUnavailable(
                    RankingError::Timeout,
                ));
            }
        };

        if candidates.is_empty() {
            return PrimaryOutcome::Fallback(FallbackReason::RankingEmpty);
        }

        let ids = self.candidate_ids(&candidates);
        if ids.is_empty() {
            return PrimaryOutcome::Fallback(FallbackReason::Unresolved);
        }

        let items = match self.repository.get_by_ids(&ids).await {
            Ok(items) => items,
            Err(err) => {
                self.logger
                    .warn(&format!("Failed to resolve ranked candidates: {}", err));
                return PrimaryOutcome::Fallback(FallbackReason::Unresolved);
            }
        };

        let ordered = order_by_rank(&ids, items, limit);
        if ordered.is_empty() {
            return PrimaryOutcome::Fallback(FallbackReason::Unresolved);
        }

        PrimaryOutcome::Served(ordered)
    }

    /// Valid, de-duplicated candidate ids in rank order.
    fn candidate_ids(&self, candidates: &[Candidate]) -> Vec<ItemId> {
        let mut seen = HashSet::with_capacity(candidates.len());
        let mut ids = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match candidate.id.parse::<ItemId>() {
                Ok(id) => {
                    if seen.insert(id) {
                        ids.push(id);
                    }
                }
                Err(_) => self.logger.debug(&format!(
                    "Dropping malformed candidate id: {:?}",
                    candidate.id
                )),
            }
        }

        ids
    }

    async fn resolve_fallback(&self, limit: usize) -> Result<Vec<Item>, RecommendationError> {
        let items = tokio::time::timeout(
            self.settings.fallback_timeout,
            self.repository
                .get_top_by_attribute(SortAttribute::RankingScore, limit),
        )
        .await
        .map_err(|_| {
            self.logger
                .error("Record store timed out while resolving fallback recommendations");
            RecommendationError::RecordStoreUnavailable
        })?
        .map_err(|err| {
            self.logger.error(&format!(
                "Record store failed while resolving fallback recommendations: {}",
                err
            ));
            RecommendationError::RecordStoreUnavailable
        })?;

        let mut seen = HashSet::with_capacity(items.len());
        Ok(items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .take(limit)
            .collect())
    }

    fn log_fallback(&self, reason: &FallbackReason) {
        let message = format!("Falling back to ranking score order: {}", reason);
        match reason {
            FallbackReason::Unconfigured => self.logger.debug(&message),
            FallbackReason::RankingUnavailable(_) => self.logger.warn(&message),
            FallbackReason::RankingEmpty | FallbackReason::Unresolved => {
                self.logger.info(&message)
            }
        }
    }
}

/// Re-sorts resolved items into candidate rank order, dropping ids the store
/// did not return and anything it returned unasked.
fn order_by_rank(ids: &[ItemId], items: Vec<Item>, limit: usize) -> Vec<Item> {
    let mut by_id: HashMap<ItemId, Item> =
        items.into_iter().map(|item| (item.id, item)).collect();

    ids.iter()
        .filter_map(|id| by_id.remove(id))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use mockall::mock;
    use mockall::predicate::eq;
    use proptest::prelude::*;
    use uuid::Uuid;

    mock! {
        pub ItemRepo {}

        #[async_trait]
        impl ItemRepository for ItemRepo {
            async fn get_by_id(&self, id: &ItemId) -> Result<Item, RepositoryError>;
            async fn get_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError>;
            async fn get_top_by_attribute(
                &self,
                attribute: SortAttribute,
                limit: usize,
            ) -> Result<Vec<Item>, RepositoryError>;
        }
    }

    mock! {
        pub Ranking {}

        #[async_trait]
        impl RankingSource for Ranking {
            fn is_configured(&self) -> bool;
            async fn top_candidates(&self, limit: usize) -> Result<Vec<Candidate>, RankingError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn item_id(n: u128) -> ItemId {
        ItemId::new(Uuid::from_u128(n))
    }

    fn item(n: u128, score: Option<f64>) -> Item {
        Item::from_repository(item_id(n), format!("Item {}", n), None, score, Some(3))
    }

    fn candidate(n: u128) -> Candidate {
        Candidate::new(item_id(n).to_string())
    }

    fn unconfigured_ranking() -> MockRanking {
        let mut ranking = MockRanking::new();
        ranking.expect_is_configured().return_const(false);
        ranking.expect_top_candidates().times(0);
        ranking
    }

    fn ranking_returning(result: Result<Vec<Candidate>, RankingError>) -> MockRanking {
        let mut ranking = MockRanking::new();
        ranking.expect_is_configured().return_const(true);
        ranking
            .expect_top_candidates()
            .times(1)
            .returning(move |_| result.clone());
        ranking
    }

    fn fallback_repo(items: Vec<Item>) -> MockItemRepo {
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids().times(0);
        repo.expect_get_top_by_attribute()
            .with(eq(SortAttribute::RankingScore), mockall::predicate::always())
            .returning(move |_, _| Ok(items.clone()));
        repo
    }

    fn use_case(repo: MockItemRepo, ranking: MockRanking) -> ResolveRecommendationsUseCaseImpl {
        use_case_with_logger(repo, ranking, mock_logger())
    }

    fn use_case_with_logger(
        repo: MockItemRepo,
        ranking: MockRanking,
        logger: Arc<dyn Logger>,
    ) -> ResolveRecommendationsUseCaseImpl {
        ResolveRecommendationsUseCaseImpl {
            repository: Arc::new(repo),
            ranking_source: Arc::new(ranking),
            logger,
            settings: RecommendationSettings::default(),
        }
    }

    fn ids_of(result: &RecommendationResult) -> Vec<ItemId> {
        result.items.iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn should_reject_request_before_any_io_when_limit_is_not_positive() {
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids().times(0);
        repo.expect_get_top_by_attribute().times(0);
        let mut ranking = MockRanking::new();
        ranking.expect_is_configured().times(0);
        ranking.expect_top_candidates().times(0);

        let use_case = use_case(repo, ranking);

        for limit in [0, -1] {
            let result = use_case
                .execute(ResolveRecommendationsParams { limit })
                .await;
            assert!(matches!(result, Err(RecommendationError::InvalidRequest)));
        }
    }

    #[tokio::test]
    async fn should_use_fallback_without_querying_ranking_when_unconfigured() {
        let repo = fallback_repo(vec![item(1, Some(9.0)), item(2, Some(4.0))]);
        let use_case = use_case(repo, unconfigured_ranking());

        let result = use_case
            .execute(ResolveRecommendationsParams { limit: 5 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(1), item_id(2)]);
    }

    #[tokio::test]
    async fn should_preserve_rank_order_and_drop_unresolved_candidates() {
        let ranking = ranking_returning(Ok(vec![candidate(1), candidate(2), candidate(3)]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .withf(|ids| ids == [item_id(1), item_id(2), item_id(3)])
            .times(1)
            // Store answers in arrival order, not rank order, and misses c2.
            .returning(|_| Ok(vec![item(3, None), item(1, None)]));
        repo.expect_get_top_by_attribute().times(0);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Ranking);
        assert_eq!(ids_of(&result), vec![item_id(1), item_id(3)]);
    }

    #[tokio::test]
    async fn should_fall_back_when_ranking_times_out() {
        let ranking = ranking_returning(Err(RankingError::Timeout));
        let repo = fallback_repo(vec![item(7, Some(1.0))]);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 4 })
            .await;

        let result = result.unwrap();
        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(7)]);
    }

    struct HangingRanking;

    #[async_trait]
    impl RankingSource for HangingRanking {
        fn is_configured(&self) -> bool {
            true
        }

        async fn top_candidates(&self, _limit: usize) -> Result<Vec<Candidate>, RankingError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(vec![candidate(1)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_fall_back_when_ranking_source_hangs_past_budget() {
        let repo = fallback_repo(vec![item(5, Some(2.0))]);
        let use_case = ResolveRecommendationsUseCaseImpl {
            repository: Arc::new(repo),
            ranking_source: Arc::new(HangingRanking),
            logger: mock_logger(),
            settings: RecommendationSettings::default(),
        };

        let result = use_case
            .execute(ResolveRecommendationsParams { limit: 2 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(5)]);
    }

    #[tokio::test]
    async fn should_log_warning_when_ranking_is_unavailable() {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        logger.expect_error().times(0);
        logger.expect_warn().times(1).returning(|_| ());

        let ranking = ranking_returning(Err(RankingError::Connection));
        let repo = fallback_repo(vec![]);

        let result = use_case_with_logger(repo, ranking, Arc::new(logger))
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_return_empty_list_when_both_paths_are_empty() {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        logger.expect_warn().times(0);
        logger.expect_error().times(0);

        let ranking = ranking_returning(Ok(vec![]));
        let repo = fallback_repo(vec![]);

        let result = use_case_with_logger(repo, ranking, Arc::new(logger))
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await
            .unwrap();

        assert!(result.items.is_empty());
        assert_eq!(result.provenance, Provenance::Fallback);
    }

    #[tokio::test]
    async fn should_fall_back_when_no_candidate_resolves() {
        let ranking = ranking_returning(Ok(vec![candidate(1), candidate(2)]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids().times(1).returning(|_| Ok(vec![]));
        repo.expect_get_top_by_attribute()
            .times(1)
            .returning(|_, _| Ok(vec![item(9, Some(8.0))]));

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 2 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(9)]);
    }

    #[tokio::test]
    async fn should_drop_malformed_ids_before_lookup() {
        let ranking = ranking_returning(Ok(vec![
            Candidate::new("not-a-record-id"),
            candidate(2),
            Candidate::new(""),
        ]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .withf(|ids| ids == [item_id(2)])
            .times(1)
            .returning(|_| Ok(vec![item(2, None)]));
        repo.expect_get_top_by_attribute().times(0);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await
            .unwrap();

        assert_eq!(ids_of(&result), vec![item_id(2)]);
    }

    #[tokio::test]
    async fn should_fall_back_without_lookup_when_every_candidate_is_malformed() {
        let ranking = ranking_returning(Ok(vec![Candidate::new("abc"), Candidate::new("123")]));
        let repo = fallback_repo(vec![item(4, Some(1.5))]);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(4)]);
    }

    #[tokio::test]
    async fn should_deduplicate_candidates_keeping_first_rank() {
        let ranking = ranking_returning(Ok(vec![
            candidate(2),
            candidate(1),
            candidate(2),
            candidate(3),
        ]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .withf(|ids| ids == [item_id(2), item_id(1), item_id(3)])
            .times(1)
            .returning(|ids| {
                Ok(ids
                    .iter()
                    .rev()
                    .map(|id| item(id.as_uuid().as_u128(), None))
                    .collect())
            });
        repo.expect_get_top_by_attribute().times(0);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 10 })
            .await
            .unwrap();

        assert_eq!(ids_of(&result), vec![item_id(2), item_id(1), item_id(3)]);
    }

    #[tokio::test]
    async fn should_truncate_to_limit_when_store_returns_more_than_requested() {
        let ranking = ranking_returning(Ok(vec![candidate(1), candidate(2), candidate(3)]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .returning(|_| Ok(vec![item(1, None), item(2, None), item(3, None)]));
        repo.expect_get_top_by_attribute().times(0);

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 2 })
            .await
            .unwrap();

        assert_eq!(ids_of(&result), vec![item_id(1), item_id(2)]);
    }

    #[tokio::test]
    async fn should_fall_back_when_candidate_lookup_fails() {
        let ranking = ranking_returning(Ok(vec![candidate(1)]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .returning(|_| Err(RepositoryError::DatabaseError));
        repo.expect_get_top_by_attribute()
            .times(1)
            .returning(|_, _| Ok(vec![item(6, Some(3.0))]));

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 1 })
            .await
            .unwrap();

        assert_eq!(result.provenance, Provenance::Fallback);
        assert_eq!(ids_of(&result), vec![item_id(6)]);
    }

    #[tokio::test]
    async fn should_propagate_record_store_failure_on_fallback_path() {
        let mut repo = MockItemRepo::new();
        repo.expect_get_top_by_attribute()
            .returning(|_, _| Err(RepositoryError::DatabaseError));

        let result = use_case(repo, unconfigured_ranking())
            .execute(ResolveRecommendationsParams { limit: 3 })
            .await;

        assert!(matches!(
            result,
            Err(RecommendationError::RecordStoreUnavailable)
        ));
    }

    #[tokio::test]
    async fn should_truncate_and_deduplicate_fallback_items() {
        let repo = fallback_repo(vec![
            item(1, Some(5.0)),
            item(1, Some(5.0)),
            item(2, Some(4.0)),
            item(3, Some(3.0)),
        ]);

        let result = use_case(repo, unconfigured_ranking())
            .execute(ResolveRecommendationsParams { limit: 2 })
            .await
            .unwrap();

        assert_eq!(ids_of(&result), vec![item_id(1), item_id(2)]);
    }

    #[tokio::test]
    async fn should_return_same_result_for_repeated_calls() {
        let mut ranking = MockRanking::new();
        ranking.expect_is_configured().return_const(true);
        ranking
            .expect_top_candidates()
            .times(2)
            .returning(|_| Ok(vec![candidate(3), candidate(1)]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_by_ids()
            .times(2)
            .returning(|_| Ok(vec![item(1, None), item(3, None)]));

        let use_case = use_case(repo, ranking);
        let first = use_case
            .execute(ResolveRecommendationsParams { limit: 5 })
            .await
            .unwrap();
        let second = use_case
            .execute(ResolveRecommendationsParams { limit: 5 })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(ids_of(&first), vec![item_id(3), item_id(1)]);
    }

    #[tokio::test]
    async fn should_request_limit_candidates_from_ranking_source() {
        let mut ranking = MockRanking::new();
        ranking.expect_is_configured().return_const(true);
        ranking
            .expect_top_candidates()
            .with(eq(7usize))
            .times(1)
            .returning(|_| Ok(vec![]));
        let mut repo = MockItemRepo::new();
        repo.expect_get_top_by_attribute()
            .with(eq(SortAttribute::RankingScore), eq(7usize))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let result = use_case(repo, ranking)
            .execute(ResolveRecommendationsParams { limit: 7 })
            .await;

        assert!(result.is_ok());
    }

    struct FixedRanking(Vec<Candidate>);

    #[async_trait]
    impl RankingSource for FixedRanking {
        fn is_configured(&self) -> bool {
            true
        }

        async fn top_candidates(&self, _limit: usize) -> Result<Vec<Candidate>, RankingError> {
            Ok(self.0.clone())
        }
    }

    struct InMemoryItems(Vec<Item>);

    #[async_trait]
    impl ItemRepository for InMemoryItems {
        async fn get_by_id(&self, id: &ItemId) -> Result<Item, RepositoryError> {
            self.0
                .iter()
                .find(|item| item.id == *id)
                .cloned()
                .ok_or(RepositoryError::NotFound)
        }

        async fn get_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .filter(|item| ids.contains(&item.id))
                .cloned()
                .collect())
        }

        async fn get_top_by_attribute(
            &self,
            _attribute: SortAttribute,
            limit: usize,
        ) -> Result<Vec<Item>, RepositoryError> {
            let mut items: Vec<Item> = self
                .0
                .iter()
                .filter(|item| item.ranking_score.is_some())
                .cloned()
                .collect();
            items.sort_by(|a, b| {
                b.ranking_score
                    .partial_cmp(&a.ranking_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.id.cmp(&b.id))
            });
            items.truncate(limit);
            Ok(items)
        }
    }

    proptest! {
        #[test]
        fn should_never_exceed_limit_or_repeat_ids(
            limit in 1i64..12,
            ranked in proptest::collection::vec(0u128..16, 0..24),
            stored in proptest::collection::vec((0u128..16, proptest::option::of(0.0f64..10.0)), 0..24),
            malformed in proptest::collection::vec("[a-z]{0,6}", 0..4),
        ) {
            let mut candidates: Vec<Candidate> = ranked.into_iter().map(candidate).collect();
            candidates.extend(malformed.into_iter().map(Candidate::new));
            let items: Vec<Item> = stored
                .into_iter()
                .map(|(n, score)| item(n, score))
                .collect();

            let use_case = ResolveRecommendationsUseCaseImpl {
                repository: Arc::new(InMemoryItems(items)),
                ranking_source: Arc::new(FixedRanking(candidates)),
                logger: mock_logger(),
                settings: RecommendationSettings::default(),
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            let result = runtime
                .block_on(use_case.execute(ResolveRecommendationsParams { limit }))
                .unwrap();

            let ids = ids_of(&result);
            let unique: HashSet<ItemId> = ids.iter().copied().collect();
            prop_assert!(ids.len() <= limit as usize);
            prop_assert_eq!(unique.len(), ids.len());
        }
    }
}
