use super::domain::{AffiliateLink, ScoredLink};
use super::scoring::{link_commission, link_effective_value, rank_links};
use super::settings::AffiliateSettings;
use super::strategy::ScoringStrategy;

/// Pick the single best active link for one product.
///
/// Inactive links are dropped before anything else. With no active link the result is `None`;
/// with exactly one, that link wins whatever the strategy. On exact ties the earliest link in
/// input order is kept.
pub fn select_best_link<'a, S>(
    links: &'a [AffiliateLink],
    strategy: ScoringStrategy,
    network_priority: &[S],
    preferred_link_id: Option<&str>,
) -> Option<&'a AffiliateLink>
where
    S: AsRef<str>,
{
    let active: Vec<&AffiliateLink> = links.iter().filter(|link| link.is_active).collect();

    match active.as_slice() {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    match strategy {
        ScoringStrategy::HighestCommission => first_greatest(&active, link_commission),
        ScoringStrategy::HighestEffectiveValue => first_greatest(&active, link_effective_value),
        ScoringStrategy::PreferDirect => network_priority
            .iter()
            .find_map(|network| {
                active
                    .iter()
                    .copied()
                    .find(|link| link.matches_network(network.as_ref()))
            })
            .or_else(|| first_greatest(&active, link_effective_value)),
        ScoringStrategy::Manual => preferred_link_id
            .and_then(|preferred| {
                active
                    .iter()
                    .copied()
                    .find(|link| link.id.as_str() == preferred)
            })
            .or_else(|| first_greatest(&active, link_effective_value)),
    }
}

fn first_greatest<'a, F>(links: &[&'a AffiliateLink], value_of: F) -> Option<&'a AffiliateLink>
where
    F: Fn(&AffiliateLink) -> f64,
{
    let mut best: Option<(&'a AffiliateLink, f64)> = None;
    for link in links.iter().copied() {
        let value = value_of(link);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((link, value)),
        }
    }
    best.map(|(link, _)| link)
}

/// Stateless scorer bound to one settings snapshot.
#[derive(Debug, Clone, Default)]
pub struct LinkScorer {
    settings: AffiliateSettings,
}

impl LinkScorer {
    pub fn new(settings: AffiliateSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AffiliateSettings {
        &self.settings
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.settings.strategy
    }

    pub fn select<'a>(
        &self,
        links: &'a [AffiliateLink],
        preferred_link_id: Option<&str>,
    ) -> Option<&'a AffiliateLink> {
        select_best_link(
            links,
            self.settings.strategy,
            self.settings.network_priority.as_slice(),
            preferred_link_id,
        )
    }

    pub fn rank(&self, links: &[AffiliateLink]) -> Vec<ScoredLink> {
        rank_links(links)
    }
}
