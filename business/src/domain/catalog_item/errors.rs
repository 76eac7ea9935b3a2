#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("item.not_found")]
    NotFound,
    #[error("item.invalid_id")]
    InvalidId,
    #[error("repository.persistence")]
    Repository(#[from] crate::domain::errors::RepositoryError),
}
