//! Effective-value formula and the ranking helpers built on top of it.
//!
//! `effective_value = commission_rate * cookie_factor * conversion_rate`, where the cookie factor
//! is `ln(cookie_days + 1) / ln(31)`. A 30-day window is the reference point (factor 1.0); longer
//! windows earn logarithmically less extra credit and a zero-day window earns nothing.
//!
//! Negative, NaN and infinite inputs are clamped to zero so every result is finite and
//! non-negative. Zero is always `+0.0`.

use super::domain::{AffiliateLink, ScoredLink, DEFAULT_CONVERSION_RATE, DEFAULT_COOKIE_DAYS};

/// Errors surfaced while interpreting scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error(
        "unknown scoring strategy '{value}' (expected one of highest_commission, \
         highest_effective_value, prefer_direct, manual)"
    )]
    UnknownStrategy { value: String },
}

fn cookie_factor(cookie_days: i64) -> f64 {
    let days = cookie_days.max(0) as f64;
    (days + 1.0).ln() / ((DEFAULT_COOKIE_DAYS + 1) as f64).ln()
}

fn non_negative(value: f64) -> f64 {
    // also folds -0.0 into +0.0
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

pub fn effective_value(commission_rate: f64, cookie_days: i64, conversion_rate: f64) -> f64 {
    non_negative(
        non_negative(commission_rate) * cookie_factor(cookie_days) * non_negative(conversion_rate),
    )
}

pub fn effective_value_default_conversion(commission_rate: f64, cookie_days: i64) -> f64 {
    effective_value(commission_rate, cookie_days, DEFAULT_CONVERSION_RATE)
}

/// Commission compared by `highest_commission`, clamped like the formula inputs.
pub fn link_commission(link: &AffiliateLink) -> f64 {
    non_negative(link.commission_or_default())
}

/// Effective value of a link with the storage defaults substituted for absent fields.
///
/// Does not look at `is_active`.
pub fn link_effective_value(link: &AffiliateLink) -> f64 {
    effective_value(
        link_commission(link),
        link.cookie_days_or_default(),
        link.conversion_or_default(),
    )
}

/// Active links ordered by effective value, highest first. Equal values keep input order.
pub fn rank_links(links: &[AffiliateLink]) -> Vec<ScoredLink> {
    let mut ranked: Vec<ScoredLink> = links
        .iter()
        .filter(|link| link.is_active)
        .map(|link| ScoredLink {
            link: link.clone(),
            effective_value: link_effective_value(link),
        })
        .collect();

    ranked.sort_by(|a, b| b.effective_value.total_cmp(&a.effective_value));
    ranked
}

pub fn format_effective_value(value: f64) -> String {
    format!("{:.4}%", value * 100.0)
}
