use affiliate_ranker::affiliate::catalog::{
    CatalogRepository, Product, ProductQuery, RepositoryError,
};
use affiliate_ranker::affiliate::{AffiliateLink, AffiliateSettingsRecord, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Seed document for the in-memory catalog.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct CatalogSeed {
    #[serde(default)]
    pub(crate) products: Vec<Product>,
    #[serde(default)]
    pub(crate) links: Vec<AffiliateLink>,
    #[serde(default)]
    pub(crate) settings: Option<AffiliateSettingsRecord>,
}

impl CatalogSeed {
    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, std::io::Error> {
        serde_json::from_reader(reader).map_err(std::io::Error::from)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalogRepository {
    seed: Arc<Mutex<CatalogSeed>>,
}

impl InMemoryCatalogRepository {
    pub(crate) fn from_seed(seed: CatalogSeed) -> Self {
        Self {
            seed: Arc::new(Mutex::new(seed)),
        }
    }

    /// Insert or replace a link by id.
    pub(crate) fn upsert_link(&self, link: AffiliateLink) {
        let mut guard = self.seed.lock().expect("catalog mutex poisoned");
        match guard.links.iter_mut().find(|existing| existing.id == link.id) {
            Some(existing) => *existing = link,
            None => guard.links.push(link),
        }
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let guard = self.seed.lock().expect("catalog mutex poisoned");
        Ok(guard
            .products
            .iter()
            .filter(|product| query.matches(product))
            .cloned()
            .collect())
    }

    fn links_for(&self, product_ids: &[ProductId]) -> Result<Vec<AffiliateLink>, RepositoryError> {
        let guard = self.seed.lock().expect("catalog mutex poisoned");
        Ok(guard
            .links
            .iter()
            .filter(|link| link.is_active && product_ids.contains(&link.product_id))
            .cloned()
            .collect())
    }

    fn settings(&self) -> Result<Option<AffiliateSettingsRecord>, RepositoryError> {
        let guard = self.seed.lock().expect("catalog mutex poisoned");
        Ok(guard.settings.clone())
    }
}

pub(crate) fn parse_strategy(
    raw: &str,
) -> Result<affiliate_ranker::affiliate::ScoringStrategy, String> {
    raw.parse().map_err(|err| format!("{err}"))
}
