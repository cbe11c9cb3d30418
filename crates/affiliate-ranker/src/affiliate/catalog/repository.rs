use super::domain::{Product, ProductQuery};
use crate::affiliate::domain::{AffiliateLink, ProductId};
use crate::affiliate::settings::AffiliateSettingsRecord;

/// Storage abstraction so the catalog service can be exercised in isolation.
pub trait CatalogRepository: Send + Sync {
    /// Products visible on the site that satisfy the query filters.
    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>;
    fn links_for(&self, product_ids: &[ProductId]) -> Result<Vec<AffiliateLink>, RepositoryError>;
    /// The settings row, or `None` when it has never been saved.
    fn settings(&self) -> Result<Option<AffiliateSettingsRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
