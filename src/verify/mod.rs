//! Candidate ticker verification
//!
//! A candidate that looks like a ticker still has to be shown to belong to
//! the company in question. The chain, strongest signal first:
//!
//! 1. Yahoo quote metadata: the registered display name must score above
//!    0.75 against the input — a miss here is final, no looser re-check
//! 2. character overlap between the ticker and the normalized company name
//!    (used when the quote source has no name or is unreachable)
//! 3. Alpha Vantage symbol registry, then a format-only last resort — the
//!    weakest link, deliberately permissive for delisted symbols no source
//!    knows anymore

use std::collections::HashSet;
use std::time::Duration;

use crate::matching::{normalize, similarity};
use crate::online::{alphavantage, yahoo};

const NAME_MATCH_THRESHOLD: f64 = 0.75;
const LETTER_OVERLAP_THRESHOLD: f64 = 0.6;
const FALLBACK_DELAY: Duration = Duration::from_secs(1);

/// Tokens that show up near company names all the time without ever being
/// that company's ticker
const COMMON_FALSE_POSITIVES: &[&str] = &[
    "THE", "AND", "FOR", "WITH", "FROM", "HTML", "HTTP", "HTTPS",
    "NEWS", "INFO", "HELP", "MORE", "ABOUT", "CONTACT", "HOME",
    "MAIN", "MENU", "SEARCH", "LOGIN", "PAGE", "SITE", "LINK",
    "NYSE", "NASDAQ", "NASDA", "NASD", "MKT", "COM", "ORG", "NET",
];

/// Confirm that a ticker actually corresponds to the given company.
pub async fn verify_ticker(ticker: &str, company_name: &str) -> bool {
    match yahoo::fetch_quote_name(ticker).await {
        Ok(Some(quote_name)) => {
            let score = similarity(company_name, &quote_name);
            log::info!(
                "Quote verification: {} -> '{}' (similarity {:.2})",
                ticker,
                quote_name,
                score
            );
            if score > NAME_MATCH_THRESHOLD {
                true
            } else {
                log::debug!("Similarity too low ({:.2}), rejecting {}", score, ticker);
                false
            }
        }
        Ok(None) => {
            log::debug!(
                "No display name for {} (possibly delisted), using fallback checks",
                ticker
            );
            fallback_verification(ticker, company_name).await
        }
        Err(e) => {
            log::debug!("Quote lookup failed for {}: {}", ticker, e);
            fallback_verification(ticker, company_name).await
        }
    }
}

/// Offline-signal fallback when the quote source gave no name.
async fn fallback_verification(ticker: &str, company_name: &str) -> bool {
    if ticker.len() >= 2 && ticker.chars().all(|c| c.is_ascii_uppercase()) {
        if COMMON_FALSE_POSITIVES.contains(&ticker) {
            log::debug!("{} is a known false positive, rejecting", ticker);
            return false;
        }
        return letter_overlap_accepts(ticker, company_name);
    }

    tokio::time::sleep(FALLBACK_DELAY).await;
    symbol_registry_accepts(ticker).await
}

/// Accept when at least 60% of the ticker's distinct letters appear in the
/// normalized company name.
fn letter_overlap_accepts(ticker: &str, company_name: &str) -> bool {
    let company_chars: HashSet<char> = normalize(company_name)
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    let ticker_chars: HashSet<char> = ticker.chars().collect();

    if ticker_chars.is_empty() {
        return false;
    }

    let matching = ticker_chars.intersection(&company_chars).count();
    let accepted = matching as f64 >= ticker_chars.len() as f64 * LETTER_OVERLAP_THRESHOLD;

    if accepted {
        log::debug!("Letter overlap accepts {} ({}/{})", ticker, matching, ticker_chars.len());
    } else {
        log::debug!("Letter overlap rejects {} ({}/{})", ticker, matching, ticker_chars.len());
    }
    accepted
}

/// Symbol-registry check, then the format-only last resort.
async fn symbol_registry_accepts(ticker: &str) -> bool {
    match alphavantage::symbol_search(ticker).await {
        Ok(matches) => {
            if matches.iter().any(|m| m.symbol.eq_ignore_ascii_case(ticker)) {
                log::info!("Symbol registry confirms {}", ticker);
                return true;
            }
        }
        Err(e) => log::debug!("Symbol search unavailable for {}: {}", ticker, e),
    }

    // Last resort: shape says ticker, nothing says web artifact
    let accepted = (2..=5).contains(&ticker.len())
        && ticker.chars().all(|c| c.is_ascii_alphabetic())
        && !is_web_content_shape(ticker);

    if accepted {
        log::debug!("Format-only acceptance for {}", ticker);
    }
    accepted
}

/// Tokens that are obviously page chrome rather than symbols
fn is_web_content_shape(ticker: &str) -> bool {
    matches!(
        ticker.to_ascii_uppercase().as_str(),
        "DIV" | "SPAN" | "HTML" | "HEAD" | "BODY" | "TITLE" | "META"
            | "HTTP" | "HTTPS" | "WWW" | "FTP"
            | "NEWS" | "INFO" | "HELP" | "HOME" | "MAIN" | "MENU"
            | "LOGIN" | "SIGNUP" | "REGISTER" | "SUBMIT"
            | "ABOUT" | "CONTACT" | "PRIVACY" | "TERMS"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_overlap_accepts_related_ticker() {
        // A, P, L all occur in APPLE
        assert!(letter_overlap_accepts("AAPL", "Apple Inc."));
        assert!(letter_overlap_accepts("MSFT", "Microsoft Corp"));
    }

    #[test]
    fn test_letter_overlap_rejects_unrelated_ticker() {
        assert!(!letter_overlap_accepts("XYZ", "Apple Inc."));
    }

    #[tokio::test]
    async fn test_fallback_rejects_known_false_positives() {
        for token in ["NYSE", "HTML", "NEWS", "NASDAQ"] {
            assert!(!fallback_verification(token, "Some Company Inc").await);
        }
    }

    #[tokio::test]
    async fn test_fallback_uses_letter_overlap_for_well_formed_tickers() {
        // Uppercase, length >= 2: decided offline, no network involved
        assert!(fallback_verification("AAPL", "Apple Inc.").await);
        assert!(!fallback_verification("QQZZ", "Apple Inc.").await);
    }

    #[test]
    fn test_web_content_shapes() {
        assert!(is_web_content_shape("DIV"));
        assert!(is_web_content_shape("CONTACT"));
        assert!(!is_web_content_shape("AGN"));
    }

    #[tokio::test]
    #[ignore] // Hits the live Yahoo API
    async fn test_verify_known_ticker() {
        assert!(verify_ticker("AAPL", "Apple Inc.").await);
    }
}
