use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{CatalogListing, ProductQuery, ProductWithLink};
use super::repository::{CatalogRepository, RepositoryError};
use crate::affiliate::domain::{AffiliateLink, LinkId, ProductId};
use crate::affiliate::scoring::ScoringError;
use crate::affiliate::selection::LinkScorer;
use crate::affiliate::settings::AffiliateSettings;

const LISTING_SOURCE: &str = "catalog";

/// Service composing the catalog store with the link scorer.
pub struct CatalogQueryService<R> {
    repository: Arc<R>,
    fallback_settings: AffiliateSettings,
}

impl<R> CatalogQueryService<R>
where
    R: CatalogRepository + 'static,
{
    /// `fallback_settings` apply whenever the store has no settings row.
    pub fn new(repository: Arc<R>, fallback_settings: AffiliateSettings) -> Self {
        Self {
            repository,
            fallback_settings,
        }
    }

    /// Load the scorer for one listing call from the current settings snapshot.
    pub fn scorer(&self) -> Result<LinkScorer, CatalogServiceError> {
        let settings = match self.repository.settings() {
            Ok(Some(record)) => AffiliateSettings::try_from(record)?,
            Ok(None) => self.fallback_settings.clone(),
            Err(err) => {
                warn!(error = %err, "affiliate settings unavailable, using fallback settings");
                self.fallback_settings.clone()
            }
        };

        Ok(LinkScorer::new(settings))
    }

    /// List products with the best affiliate link merged into each entry.
    pub fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<CatalogListing, CatalogServiceError> {
        let scorer = self.scorer()?;
        let products = self.repository.products(query)?;

        if products.is_empty() {
            debug!(strategy = %scorer.strategy(), "no products matched listing query");
            return Ok(CatalogListing {
                products: Vec::new(),
                total: 0,
                strategy: scorer.strategy(),
                source: LISTING_SOURCE.to_string(),
            });
        }

        let product_ids: Vec<ProductId> =
            products.iter().map(|product| product.id.clone()).collect();
        let links = match self.repository.links_for(&product_ids) {
            Ok(links) => links,
            Err(err) => {
                warn!(error = %err, "affiliate links unavailable, listing products without links");
                Vec::new()
            }
        };

        let mut links_by_product: HashMap<ProductId, Vec<AffiliateLink>> = HashMap::new();
        for link in links {
            links_by_product
                .entry(link.product_id.clone())
                .or_default()
                .push(link);
        }

        let mut linked = 0usize;
        let entries: Vec<ProductWithLink> = products
            .into_iter()
            .map(|product| {
                let product_links = links_by_product
                    .get(&product.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                let preferred = product.preferred_link_id.as_ref().map(LinkId::as_str);
                let best = scorer.select(product_links, preferred);
                if best.is_some() {
                    linked += 1;
                }

                let mut entry = ProductWithLink::new(product, best);
                if query.include_all_links {
                    entry.all_links = Some(scorer.rank(product_links));
                }
                entry
            })
            .collect();

        debug!(
            strategy = %scorer.strategy(),
            products = entries.len(),
            linked,
            "catalog listing assembled"
        );

        Ok(CatalogListing {
            total: entries.len(),
            products: entries,
            strategy: scorer.strategy(),
            source: LISTING_SOURCE.to_string(),
        })
    }
}

/// Error raised by the catalog query service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("invalid affiliate settings: {0}")]
    Settings(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
