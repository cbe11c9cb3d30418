use crate::infra::{parse_strategy, CatalogSeed, InMemoryCatalogRepository};
use affiliate_ranker::affiliate::catalog::{CatalogQueryService, ProductQuery};
use affiliate_ranker::affiliate::{
    format_effective_value, parse_links_from_path, AffiliateLink, AffiliateSettings, LinkScorer,
    ProductId, ScoringStrategy,
};
use affiliate_ranker::config::AppConfig;
use affiliate_ranker::error::AppError;
use affiliate_ranker::telemetry;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Link export to score (.csv, otherwise a JSON array of links)
    #[arg(long)]
    pub(crate) links: PathBuf,
    /// Selection strategy (defaults to AFFILIATE_STRATEGY)
    #[arg(long, value_parser = parse_strategy)]
    pub(crate) strategy: Option<ScoringStrategy>,
    /// Comma-separated network priority for prefer_direct
    #[arg(long, value_delimiter = ',')]
    pub(crate) network_priority: Vec<String>,
    /// Link to favor under the manual strategy
    #[arg(long)]
    pub(crate) preferred_link_id: Option<String>,
    /// Only report links for this product
    #[arg(long)]
    pub(crate) product: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// JSON catalog seed with products, links, and optional settings
    #[arg(long)]
    pub(crate) seed: PathBuf,
    /// Additional link CSV merged into the seed by link id
    #[arg(long)]
    pub(crate) links: Option<PathBuf>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) age_range: Option<String>,
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Attach every ranked link to each product
    #[arg(long)]
    pub(crate) all_links: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;

    let RankArgs {
        links,
        strategy,
        network_priority,
        preferred_link_id,
        product,
    } = args;

    let mut settings = config.affiliate.fallback_settings;
    if let Some(strategy) = strategy {
        settings.strategy = strategy;
    }
    let network_priority: Vec<String> = network_priority
        .into_iter()
        .map(|network| network.trim().to_string())
        .filter(|network| !network.is_empty())
        .collect();
    if !network_priority.is_empty() {
        settings.network_priority = network_priority;
    }

    let mut loaded = load_links(&links)?;
    if let Some(product) = product.as_deref() {
        loaded.retain(|link| link.product_id.as_str() == product);
    }
    info!(
        path = %links.display(),
        links = loaded.len(),
        strategy = %settings.strategy,
        "scoring link export"
    );

    let scorer = LinkScorer::new(settings);
    print!(
        "{}",
        render_ranking(&scorer, &loaded, preferred_link_id.as_deref())
    );
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_cli(&config.telemetry)?;

    let repository = InMemoryCatalogRepository::from_seed(CatalogSeed::from_path(&args.seed)?);
    if let Some(path) = args.links.as_deref() {
        let extra = parse_links_from_path(path)?;
        debug!(path = %path.display(), links = extra.len(), "merging link export into seed");
        for link in extra {
            repository.upsert_link(link);
        }
    }

    let service = CatalogQueryService::new(
        Arc::new(repository),
        config.affiliate.fallback_settings.clone(),
    );
    let listing = service.list_products(&ProductQuery {
        category: args.category,
        age_range: args.age_range,
        search: args.search,
        include_all_links: args.all_links,
    })?;

    let rendered = serde_json::to_string_pretty(&listing).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn load_links(path: &Path) -> Result<Vec<AffiliateLink>, AppError> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        return Ok(parse_links_from_path(path)?);
    }

    let file = File::open(path)?;
    let links = serde_json::from_reader(BufReader::new(file)).map_err(std::io::Error::from)?;
    Ok(links)
}

/// Group links by product in first-seen order.
fn group_by_product(links: &[AffiliateLink]) -> Vec<(ProductId, Vec<AffiliateLink>)> {
    let mut groups: Vec<(ProductId, Vec<AffiliateLink>)> = Vec::new();
    for link in links {
        match groups.iter_mut().find(|(id, _)| *id == link.product_id) {
            Some((_, group)) => group.push(link.clone()),
            None => groups.push((link.product_id.clone(), vec![link.clone()])),
        }
    }
    groups
}

fn render_ranking(
    scorer: &LinkScorer,
    links: &[AffiliateLink],
    preferred_link_id: Option<&str>,
) -> String {
    let settings: &AffiliateSettings = scorer.settings();
    let mut out = format!(
        "Strategy: {} | Network priority: {}\n",
        settings.strategy,
        settings.network_priority.join(", ")
    );

    if links.is_empty() {
        out.push_str("No affiliate links found.\n");
        return out;
    }

    for (product_id, group) in group_by_product(links) {
        out.push_str(&format!("\nProduct {}\n", product_id.as_str()));
        match scorer.select(&group, preferred_link_id) {
            Some(best) => out.push_str(&format!(
                "  Selected: {} ({}) {}\n",
                best.id.as_str(),
                best.network,
                best.url
            )),
            None => out.push_str("  Selected: none (no active links)\n"),
        }

        let ranked = scorer.rank(&group);
        if ranked.is_empty() {
            continue;
        }
        out.push_str(&format!(
            "  {:<4} {:<20} {:<12} {:>10} {:>6} {:>10}\n",
            "#", "link", "network", "commission", "cookie", "value"
        ));
        for (index, scored) in ranked.iter().enumerate() {
            let link = &scored.link;
            out.push_str(&format!(
                "  {:<4} {:<20} {:<12} {:>10} {:>6} {:>10}\n",
                index + 1,
                link.id.as_str(),
                link.network,
                link.commission_rate
                    .map(|rate| format!("{:.2}%", rate * 100.0))
                    .unwrap_or_else(|| "-".to_string()),
                link.cookie_days
                    .map(|days| format!("{days}d"))
                    .unwrap_or_else(|| "-".to_string()),
                format_effective_value(scored.effective_value),
            ));
        }
    }

    out
}
