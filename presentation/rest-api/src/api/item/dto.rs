use poem_openapi::Object;

use business::domain::catalog_item::model::Item;

#[derive(Debug, Clone, Object)]
pub struct ItemResponse {
    /// Item unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Image shown in listings
    #[oai(skip_serializing_if_is_none)]
    pub image_url: Option<String>,
    /// Score used to order items when no relationship ranking is available
    #[oai(skip_serializing_if_is_none)]
    pub ranking_score: Option<f64>,
    /// Units in stock
    #[oai(skip_serializing_if_is_none)]
    pub available_quantity: Option<u32>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            image_url: item.image_url,
            ranking_score: item.ranking_score,
            available_quantity: item.available_quantity,
        }
    }
}
