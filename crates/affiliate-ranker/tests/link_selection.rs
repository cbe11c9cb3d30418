//! Properties of the public scoring surface: formula, selection, and ranking exercised the way
//! the catalog layer consumes them.

use affiliate_ranker::affiliate::{
    effective_value, effective_value_default_conversion, format_effective_value,
    link_effective_value, parse_links, rank_links, select_best_link, AffiliateLink, LinkId,
    ProductId, ScoringStrategy, DEFAULT_NETWORK_PRIORITY,
};
use std::io::Cursor;

const EXPORT_HEADER: &str =
    "id,product_id,network,url,commission_rate,cookie_days,estimated_conversion,is_active\n";

fn offer(id: &str, network: &str, commission: f64, cookie_days: i64) -> AffiliateLink {
    AffiliateLink {
        id: LinkId::from(id),
        product_id: ProductId::from("prod-balance-board"),
        network: network.to_string(),
        url: format!("https://{network}.test/balance-board"),
        commission_rate: Some(commission),
        cookie_days: Some(cookie_days),
        estimated_conversion: Some(0.03),
        is_active: true,
        last_verified: None,
    }
}

#[test]
fn formula_is_non_negative_across_a_grid() {
    for commission in [0.0, 0.01, 0.1, 0.5, 1.0, 1.5] {
        for days in [0, 1, 7, 30, 90, 365] {
            for conversion in [0.0, 0.01, 0.03, 0.2] {
                assert!(effective_value(commission, days, conversion) >= 0.0);
            }
        }
    }
}

#[test]
fn reference_window_keeps_commission_times_conversion() {
    for (commission, conversion) in [(0.1, 0.03), (0.42, 0.07), (1.2, 0.5)] {
        let value = effective_value(commission, 30, conversion);
        assert!((value - commission * conversion).abs() < 1e-12);
    }
    assert!((effective_value_default_conversion(0.10, 30) - 0.003).abs() < 1e-12);
}

#[test]
fn competing_networks_resolve_per_strategy() {
    let links = vec![offer("impact", "impact", 0.08, 30), offer("awin", "awin", 0.12, 7)];
    let priority = ["impact", "awin"];

    let chosen = |strategy| {
        select_best_link(&links, strategy, &priority, None)
            .map(|link| link.id.as_str().to_string())
    };

    assert_eq!(chosen(ScoringStrategy::HighestCommission).as_deref(), Some("awin"));
    assert_eq!(chosen(ScoringStrategy::PreferDirect).as_deref(), Some("impact"));
    assert_eq!(
        chosen(ScoringStrategy::HighestEffectiveValue).as_deref(),
        Some("impact")
    );
}

#[test]
fn default_priority_prefers_impact_then_awin_then_amazon() {
    let links = vec![offer("amazon", "Amazon", 0.04, 1), offer("awin", "AWIN", 0.12, 7)];

    let chosen = select_best_link(
        &links,
        ScoringStrategy::PreferDirect,
        &DEFAULT_NETWORK_PRIORITY,
        None,
    );

    assert_eq!(chosen.map(|link| link.id.as_str()), Some("awin"));
}

#[test]
fn ranking_reports_formatted_values() {
    let mut retired = offer("retired", "amazon", 0.9, 365);
    retired.is_active = false;
    let links = vec![
        offer("awin", "awin", 0.12, 7),
        retired,
        offer("impact", "impact", 0.08, 30),
    ];

    let ranked = rank_links(&links);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].link.id.as_str(), "impact");
    assert_eq!(format_effective_value(ranked[0].effective_value), "0.2400%");
    assert_eq!(ranked[1].effective_value, link_effective_value(&links[0]));
}

#[test]
fn malformed_numbers_from_an_export_do_not_skew_selection() {
    let csv = format!(
        "{EXPORT_HEADER}\
         b,p-1,impact,https://impact.test/b,0.10,30,0.03,true\n\
         a,p-1,awin,https://awin.test/a,NaN,30,0.03,true\n\
         c,p-1,amazon,https://amzn.test/c,0.05,30,0.03,true\n\
         d,p-1,cj,https://cj.test/d,inf,0,0.03,true\n"
    );
    let links = parse_links(Cursor::new(csv)).expect("export parses");

    for strategy in [
        ScoringStrategy::HighestCommission,
        ScoringStrategy::HighestEffectiveValue,
    ] {
        let best = select_best_link(&links, strategy, &DEFAULT_NETWORK_PRIORITY, None)
            .expect("active links present");
        assert_eq!(best.id.as_str(), "b", "{strategy} picked {}", best.id.as_str());
    }

    let ranked = rank_links(&links);
    assert!(ranked
        .iter()
        .all(|scored| scored.effective_value.is_finite() && scored.effective_value >= 0.0));
    let ids: Vec<&str> = ranked.iter().map(|scored| scored.link.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a", "d"]);
}
