//! Affiliate link scoring and selection.
//!
//! Everything outside `catalog` is pure: functions take links and settings by reference and
//! return derived values, so they can be called concurrently from any number of listings.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod scoring;
pub mod selection;
pub mod settings;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use domain::{
    default_network_priority, AffiliateLink, LinkId, ProductId, ScoredLink,
    DEFAULT_CONVERSION_RATE, DEFAULT_COOKIE_DAYS, DEFAULT_NETWORK_PRIORITY,
};
pub use import::{parse_links, parse_links_from_path, LinkImportError};
pub use scoring::{
    effective_value, effective_value_default_conversion, format_effective_value,
    link_commission, link_effective_value, rank_links, ScoringError,
};
pub use selection::{select_best_link, LinkScorer};
pub use settings::{AffiliateSettings, AffiliateSettingsRecord};
pub use strategy::ScoringStrategy;
