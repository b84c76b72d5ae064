//! Alpha Vantage symbol search
//!
//! Used as the symbol-registry fallback during verification: given a ticker
//! string, does any exchange actually list it. The free `demo` key is enough
//! for occasional lookups; set `ALPHAVANTAGE_API_KEY` for real quota.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "bestMatches")]
    best_matches: Option<Vec<SearchMatch>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchMatch {
    #[serde(rename = "1. symbol")]
    pub symbol: String,
    #[serde(rename = "2. name")]
    pub name: Option<String>,
    #[serde(rename = "4. region")]
    pub region: Option<String>,
}

fn api_key() -> String {
    std::env::var("ALPHAVANTAGE_API_KEY").unwrap_or_else(|_| "demo".to_string())
}

/// Search for symbols matching the given keywords
pub async fn symbol_search(keywords: &str) -> Result<Vec<SearchMatch>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let url = format!(
        "{}?function=SYMBOL_SEARCH&keywords={}&apikey={}",
        BASE_URL,
        urlencoding::encode(keywords),
        api_key()
    );

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("Alpha Vantage search error: {}", response.status()));
    }

    let data: SearchResponse = response.json().await?;
    Ok(data.best_matches.unwrap_or_default())
}
