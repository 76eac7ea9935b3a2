use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::catalog_item::errors::ItemError;
use crate::domain::catalog_item::model::Item;
use crate::domain::catalog_item::repository::ItemRepository;
use crate::domain::catalog_item::use_cases::get_by_id::{GetItemByIdParams, GetItemByIdUseCase};
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;

pub struct GetItemByIdUseCaseImpl {
    pub repository: Arc<dyn ItemRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetItemByIdUseCase for GetItemByIdUseCaseImpl {
    async fn execute(&self, params: GetItemByIdParams) -> Result<Item, ItemError> {
        self.logger.info(&format!("Fetching item by id: {}", params.id));

        let item = self
            .repository
            .get_by_id(&params.id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => ItemError::NotFound,
                other => ItemError::Repository(other),
            })?;

        Ok(item)
    }
}
