//! Yahoo Finance lookups
//!
//! Two endpoints are used:
//! - the chart endpoint, for resolving a ticker to its display name
//!   (absence of a name is itself a signal: possibly delisted)
//! - the search endpoint, for fuzzy company-name search that still knows
//!   many historical symbols

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SEARCH_URL: &str = "https://query1.finance.yahoo.com/v1/finance/search";

/// HTTP client with browser headers; Yahoo rejects the default reqwest agent
fn create_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
    );

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| anyhow!("Failed to create HTTP client: {}", e))
}

/// Fetch the display name registered for a ticker.
///
/// Returns `Ok(None)` when the ticker resolves but carries no long or short
/// name — Yahoo keeps thin records for delisted symbols.
pub async fn fetch_quote_name(symbol: &str) -> Result<Option<String>> {
    let url = format!(
        "{}/{}?interval=1d&range=1d",
        CHART_URL,
        urlencoding::encode(symbol)
    );
    log::debug!("Fetching Yahoo quote metadata for {} from {}", symbol, url);

    let client = create_client()?;
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| anyhow!("Request failed for {}: {}", symbol, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("HTTP error for {}: {}", symbol, status));
    }

    let data: serde_json::Value = response
        .json()
        .await
        .map_err(|e| anyhow!("Failed to parse JSON for {}: {}", symbol, e))?;

    if let Some(error) = data
        .get("chart")
        .and_then(|c| c.get("error"))
        .and_then(|e| e.as_object())
    {
        let code = error.get("code").and_then(|c| c.as_str()).unwrap_or("unknown");
        let desc = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("No description");
        return Err(anyhow!("Yahoo API error for {}: {} - {}", symbol, code, desc));
    }

    let meta = data
        .get("chart")
        .and_then(|c| c.get("result"))
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("meta"))
        .ok_or_else(|| anyhow!("Invalid response format for {}", symbol))?;

    let name = meta
        .get("longName")
        .and_then(|n| n.as_str())
        .or_else(|| meta.get("shortName").and_then(|n| n.as_str()))
        .map(String::from)
        .filter(|n| !n.is_empty());

    Ok(name)
}

/// One hit from the fuzzy search endpoint
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub symbol: String,
    pub name: Option<String>,
    pub type_disp: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    quotes: Option<Vec<SearchQuote>>,
}

#[derive(Debug, serde::Deserialize)]
struct SearchQuote {
    symbol: Option<String>,
    longname: Option<String>,
    shortname: Option<String>,
    #[serde(rename = "typeDisp")]
    type_disp: Option<String>,
}

/// Fuzzy search by free-text query (company name, former name, ...)
pub async fn search(query: &str) -> Result<Vec<SearchHit>> {
    let client = create_client()?;

    let url = format!(
        "{}?q={}&lang=en-US&region=US&quotesCount=10&newsCount=0",
        SEARCH_URL,
        urlencoding::encode(query)
    );
    log::debug!("Yahoo search for: {}", query);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| anyhow!("Yahoo search request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Yahoo search error: {}", response.status()));
    }

    let data: SearchResponse = response
        .json()
        .await
        .map_err(|e| anyhow!("Failed to parse Yahoo search response: {}", e))?;

    let hits = data
        .quotes
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| {
            let symbol = q.symbol?;
            Some(SearchHit {
                symbol,
                name: q.longname.or(q.shortname).filter(|n| !n.is_empty()),
                type_disp: q.type_disp,
            })
        })
        .collect();

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Hits the live Yahoo API
    async fn test_search_finds_apple() {
        let results = search("apple").await.unwrap();
        assert!(results.iter().any(|r| r.symbol == "AAPL"));
    }

    #[tokio::test]
    #[ignore] // Hits the live Yahoo API
    async fn test_fetch_quote_name() {
        let name = fetch_quote_name("AAPL").await.unwrap();
        assert!(name.unwrap_or_default().to_uppercase().contains("APPLE"));
    }
}
