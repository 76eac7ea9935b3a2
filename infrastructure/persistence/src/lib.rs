pub mod db;
pub mod catalog_item {
    pub mod entity;
    pub mod repository;
}
