use sqlx::FromRow;
use uuid::Uuid;

use business::domain::catalog_item::model::Item;
use business::domain::catalog_item::value_objects::ItemId;

#[derive(Debug, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub ranking_score: Option<f64>,
    pub available_quantity: Option<i32>,
}

impl ItemEntity {
    pub fn into_domain(self) -> Item {
        Item::from_repository(
            ItemId::new(self.id),
            self.name,
            self.image_url,
            self.ranking_score,
            self.available_quantity
                .and_then(|quantity| u32::try_from(quantity).ok()),
        )
    }
}
