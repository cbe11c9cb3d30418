use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{AffiliateLink, LinkId, ProductId};

#[derive(Debug, thiserror::Error)]
pub enum LinkImportError {
    #[error("failed to read link export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid link CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' is not a valid is_active flag")]
    InvalidFlag { row: usize, value: String },
}

pub fn parse_links_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<AffiliateLink>, LinkImportError> {
    let file = File::open(path)?;
    parse_links(file)
}

/// Read affiliate links from a catalog CSV export.
pub fn parse_links<R: Read>(reader: R) -> Result<Vec<AffiliateLink>, LinkImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut links = Vec::new();

    for (index, record) in csv_reader.deserialize::<LinkRow>().enumerate() {
        let row = record?;
        // header is line 1
        let is_active = parse_flag(row.is_active.as_deref()).ok_or_else(|| {
            LinkImportError::InvalidFlag {
                row: index + 2,
                value: row.is_active.clone().unwrap_or_default(),
            }
        })?;

        links.push(AffiliateLink {
            id: LinkId(row.id),
            product_id: ProductId(row.product_id),
            network: row.network,
            url: row.url,
            commission_rate: row.commission_rate,
            cookie_days: row.cookie_days,
            estimated_conversion: row.estimated_conversion,
            is_active,
            last_verified: None,
        });
    }

    Ok(links)
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    id: String,
    product_id: String,
    network: String,
    url: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    commission_rate: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cookie_days: Option<i64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    estimated_conversion: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_active: Option<String>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value.map(|raw| raw.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") => Some(true),
        Some("true" | "yes" | "y" | "1") => Some(true),
        Some("false" | "no" | "n" | "0") => Some(false),
        Some(_) => None,
    }
}
