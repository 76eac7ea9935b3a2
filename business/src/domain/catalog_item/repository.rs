use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::model::Item;
use super::value_objects::{ItemId, SortAttribute};

/// Read-only port over the authoritative record store.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn get_by_id(&self, id: &ItemId) -> Result<Item, RepositoryError>;

    /// Point lookups for every id. Ids that do not resolve are omitted and the
    /// order of the returned items is unspecified.
    async fn get_by_ids(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError>;

    /// At most `limit` items with a value for `attribute`, highest first,
    /// ties ordered by id.
    async fn get_top_by_attribute(
        &self,
        attribute: SortAttribute,
        limit: usize,
    ) -> Result<Vec<Item>, RepositoryError>;
}
