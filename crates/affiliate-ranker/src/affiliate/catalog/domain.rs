use serde::{Deserialize, Deserializer, Serialize};

use crate::affiliate::domain::{AffiliateLink, LinkId, ProductId, ScoredLink};
use crate::affiliate::strategy::ScoringStrategy;

/// Storefront product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub show_on_site: bool,
    /// Link pinned by an editor; only consulted by the `manual` strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_link_id: Option<LinkId>,
}

fn default_true() -> bool {
    true
}

/// Filters accepted by the product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Only the literal `true` enables it; any other value leaves it off.
    #[serde(default, deserialize_with = "literal_true")]
    pub include_all_links: bool,
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref() == Some("true"))
}

impl ProductQuery {
    /// Whether a product is listed on the site and passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        if !(product.is_active && product.show_on_site) {
            return false;
        }

        if let Some(category) = non_blank(&self.category) {
            if product.category.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(age_range) = non_blank(&self.age_range) {
            if !contains_ignore_case(product.age_range.as_deref(), age_range) {
                return false;
            }
        }

        if let Some(search) = non_blank(&self.search) {
            if !contains_ignore_case(Some(&product.name), search)
                && !contains_ignore_case(product.description.as_deref(), search)
            {
                return false;
            }
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|haystack| haystack.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// Product merged with the link chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithLink {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "affiliateLink")]
    pub affiliate_link: Option<String>,
    #[serde(rename = "affiliateLinkId")]
    pub affiliate_link_id: Option<LinkId>,
    #[serde(rename = "affiliateNetwork")]
    pub affiliate_network: Option<String>,
    #[serde(rename = "allLinks", skip_serializing_if = "Option::is_none")]
    pub all_links: Option<Vec<ScoredLink>>,
}

impl ProductWithLink {
    pub fn new(product: Product, best: Option<&AffiliateLink>) -> Self {
        Self {
            product,
            affiliate_link: best.map(|link| link.url.clone()),
            affiliate_link_id: best.map(|link| link.id.clone()),
            affiliate_network: best.map(|link| link.network.clone()),
            all_links: None,
        }
    }
}

/// Listing response returned to storefront callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogListing {
    pub products: Vec<ProductWithLink>,
    pub total: usize,
    pub strategy: ScoringStrategy,
    pub source: String,
}
