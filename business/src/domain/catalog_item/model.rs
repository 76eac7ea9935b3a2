use super::value_objects::ItemId;

/// Canonical catalog record, owned by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub image_url: Option<String>,
    pub ranking_score: Option<f64>,
    pub available_quantity: Option<u32>,
}

impl Item {
    /// Constructor for data already persisted in the repository (no validation).
    pub fn from_repository(
        id: ItemId,
        name: String,
        image_url: Option<String>,
        ranking_score: Option<f64>,
        available_quantity: Option<u32>,
    ) -> Self {
        Self {
            id,
            name,
            image_url,
            ranking_score,
            available_quantity,
        }
    }
}
