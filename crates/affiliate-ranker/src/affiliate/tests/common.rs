use std::sync::{Arc, Mutex};

use crate::affiliate::catalog::{
    CatalogQueryService, CatalogRepository, Product, ProductQuery, RepositoryError,
};
use crate::affiliate::domain::{AffiliateLink, LinkId, ProductId};
use crate::affiliate::settings::{AffiliateSettings, AffiliateSettingsRecord};

pub(super) fn link(
    id: &str,
    network: &str,
    commission: Option<f64>,
    cookie: Option<i64>,
) -> AffiliateLink {
    AffiliateLink {
        id: LinkId::from(id),
        product_id: ProductId::from("prod-stacker"),
        network: network.to_string(),
        url: format!("https://{network}.test/{id}"),
        commission_rate: commission,
        cookie_days: cookie,
        estimated_conversion: None,
        is_active: true,
        last_verified: None,
    }
}

pub(super) fn inactive(mut link: AffiliateLink) -> AffiliateLink {
    link.is_active = false;
    link
}

pub(super) fn for_product(mut link: AffiliateLink, product: &str) -> AffiliateLink {
    link.product_id = ProductId::from(product);
    link
}

/// Impact pays less but holds the cookie longer; awin pays more for a week.
pub(super) fn impact_and_awin() -> Vec<AffiliateLink> {
    vec![
        link("impact-1", "impact", Some(0.08), Some(30)),
        link("awin-1", "awin", Some(0.12), Some(7)),
    ]
}

pub(super) fn product(id: &str, name: &str, category: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        description: Some(format!("{name} for curious toddlers")),
        price: Some(24.5),
        image_url: None,
        age_range: Some("18-36 months".to_string()),
        category: Some(category.to_string()),
        tags: Some(vec!["montessori".to_string()]),
        is_active: true,
        show_on_site: true,
        preferred_link_id: None,
    }
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    pub(super) products: Vec<Product>,
    pub(super) links: Vec<AffiliateLink>,
    pub(super) settings: Option<AffiliateSettingsRecord>,
    pub(super) fail_products: bool,
    pub(super) fail_links: bool,
    pub(super) fail_settings: bool,
    pub(super) link_requests: Mutex<Vec<Vec<ProductId>>>,
}

impl CatalogRepository for MemoryCatalog {
    fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        if self.fail_products {
            return Err(RepositoryError::Unavailable("products offline".to_string()));
        }
        Ok(self
            .products
            .iter()
            .filter(|product| query.matches(product))
            .cloned()
            .collect())
    }

    fn links_for(&self, product_ids: &[ProductId]) -> Result<Vec<AffiliateLink>, RepositoryError> {
        self.link_requests
            .lock()
            .expect("request log poisoned")
            .push(product_ids.to_vec());
        if self.fail_links {
            return Err(RepositoryError::Unavailable("links offline".to_string()));
        }
        Ok(self
            .links
            .iter()
            .filter(|link| product_ids.contains(&link.product_id))
            .cloned()
            .collect())
    }

    fn settings(&self) -> Result<Option<AffiliateSettingsRecord>, RepositoryError> {
        if self.fail_settings {
            return Err(RepositoryError::Unavailable("settings offline".to_string()));
        }
        Ok(self.settings.clone())
    }
}

/// Two products on the shelf: one with competing links, one with only a retired link.
pub(super) fn stocked_catalog() -> MemoryCatalog {
    MemoryCatalog {
        products: vec![
            product("prod-stacker", "Rainbow Stacker", "toys"),
            product("prod-tower", "Learning Tower", "furniture"),
        ],
        links: vec![
            for_product(link("impact-1", "impact", Some(0.08), Some(30)), "prod-stacker"),
            for_product(link("awin-1", "awin", Some(0.12), Some(7)), "prod-stacker"),
            for_product(
                inactive(link("amazon-9", "amazon", Some(0.04), Some(1))),
                "prod-tower",
            ),
        ],
        ..Default::default()
    }
}

pub(super) fn service(catalog: MemoryCatalog) -> Arc<CatalogQueryService<MemoryCatalog>> {
    Arc::new(CatalogQueryService::new(Arc::new(catalog), AffiliateSettings::default()))
}
