//! SEC EDGAR company search
//!
//! EDGAR's company browse endpoint returns HTML in which delisted issuers
//! still appear, sometimes with an explicit "Trading Symbol" line, sometimes
//! only with exchange-prefixed mentions buried in filing text.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

const BASE_URL: &str = "https://www.sec.gov/cgi-bin/browse-edgar";

// SEC asks for a descriptive agent string
const EDGAR_USER_AGENT: &str = "Mozilla/5.0 (compatible; TickerResolver/0.1; research use)";

static RE_TRADING_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i:Trading\s+Symbol)[\s:]*([A-Z]{1,5})\b").unwrap());

static RE_BROAD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i:symbol)[\s:]+([A-Z]{2,5})\b",
        r"(?i:ticker)[\s:]+([A-Z]{2,5})\b",
        r"NYSE[\s:]*([A-Z]{2,5})\b",
        r"NASDAQ[\s:]*([A-Z]{2,5})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Run a contains-match company search and return the raw page
pub async fn company_search(company_name: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .user_agent(EDGAR_USER_AGENT)
        .timeout(Duration::from_secs(15))
        .build()?;

    log::debug!("Searching EDGAR for: {}", company_name);

    let response = client
        .get(BASE_URL)
        .query(&[
            ("company", company_name),
            ("match", "contains"),
            ("action", "getcompany"),
        ])
        .send()
        .await
        .map_err(|e| anyhow!("EDGAR request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("EDGAR returned {}", response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read EDGAR response: {}", e))
}

/// Find an explicit "Trading Symbol: XXX" declaration
pub fn find_trading_symbol(content: &str) -> Option<String> {
    RE_TRADING_SYMBOL
        .captures(content)
        .map(|caps| caps[1].to_string())
}

/// Broader symbol/ticker/exchange-prefixed mentions, kept only when one of
/// the company's keywords appears within ±200 chars of the match.
pub fn broad_symbol_candidates(content: &str, keywords: &[String]) -> Vec<String> {
    let folded = content.to_ascii_lowercase();
    let mut candidates = Vec::new();

    for re in RE_BROAD_PATTERNS.iter() {
        for caps in re.captures_iter(content) {
            let Some(mat) = caps.get(1) else { continue };
            let token = mat.as_str().to_string();
            if candidates.contains(&token) {
                continue;
            }
            let start = floor_char_boundary(&folded, mat.start().saturating_sub(200));
            let end = ceil_char_boundary(&folded, (mat.end() + 200).min(folded.len()));
            let context = &folded[start..end];

            let keyword_nearby = keywords
                .iter()
                .any(|kw| context.contains(&kw.to_ascii_lowercase()));
            if keyword_nearby {
                candidates.push(token);
            }
        }
    }

    candidates
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_trading_symbol() {
        let content = "Company details. Trading Symbol: WCOM. SIC code 4813.";
        assert_eq!(find_trading_symbol(content), Some("WCOM".to_string()));
    }

    #[test]
    fn test_trading_symbol_case_insensitive_label() {
        let content = "trading symbol WCOM appears here";
        assert_eq!(find_trading_symbol(content), Some("WCOM".to_string()));
    }

    #[test]
    fn test_no_trading_symbol() {
        assert_eq!(find_trading_symbol("nothing relevant here"), None);
    }

    #[test]
    fn test_broad_candidates_require_keyword_adjacency() {
        let keywords = vec!["WORLDCOM".to_string()];

        let near = "Worldcom Inc filings, ticker: WCOM, registered in MS.";
        assert_eq!(broad_symbol_candidates(near, &keywords), vec!["WCOM"]);

        let far = format!("ticker: WCOM {} Worldcom", "z".repeat(600));
        assert!(broad_symbol_candidates(&far, &keywords).is_empty());
    }

    #[test]
    fn test_broad_candidates_deduplicate() {
        let keywords = vec!["WORLDCOM".to_string()];
        let content = "Worldcom ticker: WCOM and symbol: WCOM and NASDAQ: WCOM";
        assert_eq!(broad_symbol_candidates(content, &keywords), vec!["WCOM"]);
    }
}
