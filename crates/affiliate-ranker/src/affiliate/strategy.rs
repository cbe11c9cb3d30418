use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scoring::ScoringError;

/// Closed set of link selection strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Greatest raw commission rate.
    HighestCommission,
    /// Greatest effective value (commission, cookie window, conversion).
    #[default]
    HighestEffectiveValue,
    /// First network in priority order, falling back to effective value.
    PreferDirect,
    /// Operator-chosen link, falling back to effective value.
    Manual,
}

impl ScoringStrategy {
    pub const ALL: [ScoringStrategy; 4] = [
        ScoringStrategy::HighestCommission,
        ScoringStrategy::HighestEffectiveValue,
        ScoringStrategy::PreferDirect,
        ScoringStrategy::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStrategy::HighestCommission => "highest_commission",
            ScoringStrategy::HighestEffectiveValue => "highest_effective_value",
            ScoringStrategy::PreferDirect => "prefer_direct",
            ScoringStrategy::Manual => "manual",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = ScoringError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| ScoringError::UnknownStrategy {
                value: value.to_string(),
            })
    }
}
