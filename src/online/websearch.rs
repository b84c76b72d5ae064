//! General web search
//!
//! Last rung of the waterfall: query the DuckDuckGo HTML endpoint with a set
//! of ticker-hunting query templates and hand the raw page to the candidate
//! extractor.

use anyhow::{anyhow, Result};
use std::time::Duration;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

/// Query templates, most specific first. Quoted forms pin the exact company
/// name; the delisted variant targets issuers with no current listing.
pub fn search_queries(company_name: &str) -> Vec<String> {
    vec![
        format!("\"{}\" stock ticker symbol NYSE NASDAQ", company_name),
        format!("\"{}\" stock symbol trading", company_name),
        format!("{} ticker symbol exchange", company_name),
        format!("\"{}\" delisted stock ticker", company_name),
        format!("{} stock code symbol", company_name),
    ]
}

/// Run one query and return the raw result page
pub async fn search(query: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .timeout(Duration::from_secs(15))
        .build()?;

    let response = client
        .get(SEARCH_URL)
        .query(&[("q", query)])
        .send()
        .await
        .map_err(|e| anyhow!("Search request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Search returned {}", response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read search response: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_templates() {
        let queries = search_queries("WorldCom Inc");
        assert_eq!(queries.len(), 5);
        assert!(queries[0].contains("\"WorldCom Inc\""));
        assert!(queries.iter().any(|q| q.contains("delisted")));
    }
}
