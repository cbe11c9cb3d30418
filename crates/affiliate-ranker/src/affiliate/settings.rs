use serde::{Deserialize, Serialize};

use super::domain::default_network_priority;
use super::scoring::ScoringError;
use super::strategy::ScoringStrategy;

/// Validated selection settings, immutable for the duration of one scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateSettings {
    pub strategy: ScoringStrategy,
    pub network_priority: Vec<String>,
    /// Read by the storefront's click tracker. Link selection never consults it.
    pub track_clicks: bool,
}

impl Default for AffiliateSettings {
    fn default() -> Self {
        Self {
            strategy: ScoringStrategy::default(),
            network_priority: default_network_priority(),
            track_clicks: true,
        }
    }
}

/// Raw settings row as persisted by the CMS. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateSettingsRecord {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub network_priority: Option<Vec<String>>,
    #[serde(default)]
    pub track_clicks: Option<bool>,
}

impl TryFrom<AffiliateSettingsRecord> for AffiliateSettings {
    type Error = ScoringError;

    fn try_from(record: AffiliateSettingsRecord) -> Result<Self, Self::Error> {
        let defaults = AffiliateSettings::default();

        let strategy = match record.strategy.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse()?,
            _ => defaults.strategy,
        };

        let network_priority = record
            .network_priority
            .map(|networks| {
                networks
                    .into_iter()
                    .map(|network| network.trim().to_string())
                    .filter(|network| !network.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|networks| !networks.is_empty())
            .unwrap_or(defaults.network_priority);

        Ok(Self {
            strategy,
            network_priority,
            track_clicks: record.track_clicks.unwrap_or(defaults.track_clicks),
        })
    }
}
