//! Reference registry of known company/ticker pairs
//!
//! Loaded once at startup from the two SEC feed files:
//! - `company_tickers_exchange.json` — columnar (`fields` + `data` rows)
//! - `company_tickers.json` — map of records with `title` + `ticker`
//!
//! The exchange feed is authoritative; the plain feed only fills in tickers
//! the exchange feed lacks. A feed that is missing or malformed is logged and
//! skipped — resolution proceeds with whatever loaded.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{FeedOrigin, RegistryEntry};

/// Why a registry feed could not be loaded
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("feed is missing the '{0}' field")]
    MissingField(&'static str),
}

/// Columnar shape of the exchange feed
#[derive(Debug, Deserialize)]
struct ExchangeFeed {
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// The immutable name → ticker registry.
///
/// Constructed once, read-only afterwards; tickers are unique.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Load the registry from both feed files.
    ///
    /// Never fails: each feed error is logged as a warning and the remaining
    /// data is used, down to an empty registry.
    pub fn load(primary_path: &Path, secondary_path: &Path) -> Self {
        let mut entries = Vec::new();

        match load_feed_file(primary_path, parse_primary_feed) {
            Ok(primary) => entries.extend(primary),
            Err(e) => log::warn!(
                "Could not load primary feed {}: {}",
                primary_path.display(),
                e
            ),
        }

        match load_feed_file(secondary_path, parse_secondary_feed) {
            Ok(secondary) => entries.extend(secondary),
            Err(e) => log::warn!(
                "Could not load secondary feed {}: {}",
                secondary_path.display(),
                e
            ),
        }

        let registry = Self::from_entries(entries);
        log::info!("Loaded {} companies into the registry", registry.len());
        registry
    }

    /// Build a registry from raw entries, deduplicating by ticker.
    ///
    /// Earlier entries win, so primary-feed entries take precedence as long
    /// as they are pushed first.
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut deduped = Vec::with_capacity(entries.len());

        for entry in entries {
            if seen.insert(entry.ticker.clone()) {
                deduped.push(entry);
            }
        }

        Self { entries: deduped }
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_feed_file(
    path: &Path,
    parse: fn(&str) -> Result<Vec<RegistryEntry>, FeedError>,
) -> Result<Vec<RegistryEntry>, FeedError> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Parse the columnar exchange feed: locate the `name`/`ticker` columns,
/// then walk the rows.
fn parse_primary_feed(text: &str) -> Result<Vec<RegistryEntry>, FeedError> {
    let feed: ExchangeFeed = serde_json::from_str(text)?;

    let name_idx = feed
        .fields
        .iter()
        .position(|f| f == "name")
        .ok_or(FeedError::MissingField("name"))?;
    let ticker_idx = feed
        .fields
        .iter()
        .position(|f| f == "ticker")
        .ok_or(FeedError::MissingField("ticker"))?;

    let mut entries = Vec::with_capacity(feed.data.len());
    for row in &feed.data {
        let name = row.get(name_idx).and_then(|v| v.as_str());
        let ticker = row.get(ticker_idx).and_then(|v| v.as_str());

        if let (Some(name), Some(ticker)) = (name, ticker) {
            entries.push(RegistryEntry {
                name: name.to_string(),
                ticker: ticker.to_string(),
                origin: FeedOrigin::PrimaryFeed,
            });
        }
    }

    Ok(entries)
}

/// Parse the plain map feed: any record lacking `title` or `ticker` is
/// skipped.
fn parse_secondary_feed(text: &str) -> Result<Vec<RegistryEntry>, FeedError> {
    let feed: serde_json::Map<String, Value> = serde_json::from_str(text)?;

    let mut entries = Vec::with_capacity(feed.len());
    for record in feed.values() {
        let title = record.get("title").and_then(|v| v.as_str());
        let ticker = record.get("ticker").and_then(|v| v.as_str());

        if let (Some(title), Some(ticker)) = (title, ticker) {
            entries.push(RegistryEntry {
                name: title.to_string(),
                ticker: ticker.to_string(),
                origin: FeedOrigin::SecondaryFeed,
            });
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_feed() {
        let text = r#"{
            "fields": ["cik", "name", "ticker", "exchange"],
            "data": [
                [320193, "Apple Inc.", "AAPL", "Nasdaq"],
                [789019, "MICROSOFT CORP", "MSFT", "Nasdaq"]
            ]
        }"#;

        let entries = parse_primary_feed(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Apple Inc.");
        assert_eq!(entries[0].ticker, "AAPL");
        assert_eq!(entries[0].origin, FeedOrigin::PrimaryFeed);
    }

    #[test]
    fn test_primary_feed_missing_column() {
        let text = r#"{ "fields": ["cik", "name"], "data": [] }"#;
        let err = parse_primary_feed(text).unwrap_err();
        assert!(matches!(err, FeedError::MissingField("ticker")));
    }

    #[test]
    fn test_parse_secondary_feed_skips_incomplete_records() {
        let text = r#"{
            "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
            "1": {"cik_str": 789019, "title": "No Ticker Corp"},
            "2": {"cik_str": 1018724, "ticker": "AMZN", "title": "AMAZON COM INC"}
        }"#;

        let entries = parse_secondary_feed(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.origin == FeedOrigin::SecondaryFeed));
    }

    #[test]
    fn test_dedup_keeps_primary_over_secondary() {
        let entries = vec![
            RegistryEntry {
                name: "Apple Inc.".to_string(),
                ticker: "AAPL".to_string(),
                origin: FeedOrigin::PrimaryFeed,
            },
            RegistryEntry {
                name: "APPLE INC".to_string(),
                ticker: "AAPL".to_string(),
                origin: FeedOrigin::SecondaryFeed,
            },
            RegistryEntry {
                name: "AMAZON COM INC".to_string(),
                ticker: "AMZN".to_string(),
                origin: FeedOrigin::SecondaryFeed,
            },
        ];

        let registry = Registry::from_entries(entries);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.entries()[0].origin, FeedOrigin::PrimaryFeed);
        assert_eq!(registry.entries()[1].ticker, "AMZN");
    }

    #[test]
    fn test_load_with_missing_files_yields_empty_registry() {
        let registry = Registry::load(
            Path::new("/nonexistent/company_tickers_exchange.json"),
            Path::new("/nonexistent/company_tickers.json"),
        );
        assert!(registry.is_empty());
    }
}
