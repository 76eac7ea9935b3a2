use async_trait::async_trait;

use crate::domain::catalog_item::errors::ItemError;
use crate::domain::catalog_item::model::Item;
use crate::domain::catalog_item::value_objects::ItemId;

pub struct GetItemByIdParams {
    pub id: ItemId,
}

#[async_trait]
pub trait GetItemByIdUseCase: Send + Sync {
    async fn execute(&self, params: GetItemByIdParams) -> Result<Item, ItemError>;
}
