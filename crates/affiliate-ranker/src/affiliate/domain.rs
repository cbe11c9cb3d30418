use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cookie window assumed when a link does not declare one.
pub const DEFAULT_COOKIE_DAYS: i64 = 30;

/// Conversion estimate assumed when a link does not declare one.
pub const DEFAULT_CONVERSION_RATE: f64 = 0.03;

/// Network precedence used by `prefer_direct` when settings leave it unset.
pub const DEFAULT_NETWORK_PRIORITY: [&str; 3] = ["impact", "awin", "amazon"];

pub fn default_network_priority() -> Vec<String> {
    DEFAULT_NETWORK_PRIORITY
        .iter()
        .map(|network| network.to_string())
        .collect()
}

/// Identifier wrapper for affiliate links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub String);

impl LinkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LinkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One way to buy a product through a specific affiliate network.
///
/// Rows arrive from the catalog store already typed; the scorer only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffiliateLink {
    pub id: LinkId,
    pub product_id: ProductId,
    pub network: String,
    pub url: String,
    #[serde(default)]
    pub commission_rate: Option<f64>,
    #[serde(default)]
    pub cookie_days: Option<i64>,
    #[serde(default)]
    pub estimated_conversion: Option<f64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl AffiliateLink {
    pub fn commission_or_default(&self) -> f64 {
        self.commission_rate.unwrap_or(0.0)
    }

    pub fn cookie_days_or_default(&self) -> i64 {
        self.cookie_days.unwrap_or(DEFAULT_COOKIE_DAYS)
    }

    pub fn conversion_or_default(&self) -> f64 {
        self.estimated_conversion.unwrap_or(DEFAULT_CONVERSION_RATE)
    }

    /// Case-insensitive network comparison.
    pub fn matches_network(&self, network: &str) -> bool {
        self.network.to_lowercase() == network.to_lowercase()
    }
}

/// Link paired with its computed effective value, built on demand for ranking views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLink {
    #[serde(flatten)]
    pub link: AffiliateLink,
    #[serde(rename = "effectiveValue")]
    pub effective_value: f64,
}
