//! Product listing: loads products, links, and settings from the store and merges the best
//! affiliate link into every product.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{CatalogListing, Product, ProductQuery, ProductWithLink};
pub use repository::{CatalogRepository, RepositoryError};
pub use router::catalog_router;
pub use service::{CatalogQueryService, CatalogServiceError};
