use async_trait::async_trait;
use futures::future::join_all;
use sqlx::PgPool;

use business::domain::catalog_item::model::Item;
use business::domain::catalog_item::repository::ItemRepository;
use business::domain::catalog_item::value_objects::{ItemId, SortAttribute};
use business::domain::errors::RepositoryError;

use super::entity::ItemEntity;

const SELECT_COLUMNS: &str = "SELECT id, name, image_url, ranking_score, available_quantity FROM catalog_items";

pub struct ItemRepositoryPostgres {
    pool: PgPool,
}

impl ItemRepositoryPostgres {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(attribute: SortAttribute) -> &'static str {
    match attribute {
        SortAttribute::RankingScore => "ranking_score",
        SortAttribute::AvailableQuantity => "available_quantity",
    }
}

fn top_by_attribute_query(attribute: SortAttribute) -> String {
    let column = sort_column(attribute);
    format!(
        "{} WHERE {} IS NOT NULL ORDER BY {} DESC, id ASC LIMIT $1",
        SELECT_COLUMNS, column, column
    )
}

/// Keeps resolved items, skips ids that were not found and fails on the first
/// real store error.
fn collect_found(
    results: Vec<Result<Item, RepositoryError>>,
) -> Result<Vec<Item>, RepositoryError> {
    let mut items = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(item) => items.push(item),
            Err(RepositoryError::NotFound) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(items)
}

#[async_trait]
impl ItemRepository for ItemRepositoryPostgres {
    async fn get_by_id(&self, id: &ItemId) -> Result<Item, RepositoryError> {
        let entity = sqlx::query_as::<_, ItemEntity>(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                tracing::warn!("Item lookup failed for {}: {}", id, err);
                RepositoryError::DatabaseError
            })?
            .ok_or(RepositoryError::NotFound)?;

        Ok(entity.into_domain())
    }

    async fn get_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let lookups = ids.iter().map(|id| self.get_by_id(id));
        let results = join_all(lookups).await;

        let items = collect_found(results)?;
        tracing::debug!("Resolved {} of {} item ids", items.len(), ids.len());
        Ok(items)
    }

    async fn get_top_by_attribute(
        &self,
        attribute: SortAttribute,
        limit: usize,
    ) -> Result<Vec<Item>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let entities = sqlx::query_as::<_, ItemEntity>(&top_by_attribute_query(attribute))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|err| {
                tracing::warn!("Top items by {} failed: {}", attribute, err);
                RepositoryError::DatabaseError
            })?;

        Ok(entities.into_iter().map(|e| e.into_domain()).collect())
    }
}
