//! Ticker-candidate extraction from retrieved text
//!
//! Search results and filing pages are a soup of navigation text, HTML
//! remnants and exchange names in which the actual ticker appears once or
//! twice. Extraction runs in two stages:
//!
//! 1. precise patterns — explicit labeling idioms ("ticker: XYZ",
//!    "NYSE: XYZ", "Name (XYZ)")
//! 2. contextual fallback — looser patterns, but only inside windows around
//!    occurrences of the company's keywords
//!
//! Every match still has to clear [`is_valid_ticker_strict`], a static
//! false-positive list and a relevance check before it becomes a candidate.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::extract_keywords;

/// Tokens that look like tickers but never are: exchange names, web/HTML
/// vocabulary, common words, media outlets, legal suffixes, geo codes.
const OBVIOUS_INVALID: &[&str] = &[
    // exchanges
    "NYSE", "NASDAQ", "NASDA", "NASD", "MKT",
    // web plumbing
    "HTML", "HTTP", "HTTPS", "WWW", "COM", "ORG", "NET", "GOV",
    // common words
    "THE", "AND", "FOR", "WITH", "FROM", "THIS", "THAT",
    "MORE", "ABOUT", "CONTACT", "NEWS", "INFO", "HELP",
    "PAGE", "SITE", "LINK", "HREF", "TEXT", "FONT",
    // search engines
    "DDG", "DUCK", "GOOGLE", "BING", "YAHOO",
    // legal suffixes
    "INC", "CORP", "LTD", "LLC", "PLC",
    // geography
    "USA", "US", "UK", "CA", "NY", "IE", "EU",
    // navigation and media
    "HOME", "MAIN", "MENU", "SEARCH", "LOGIN",
    "MSN", "CNN", "BBC", "ABC", "CBS", "NBC",
    // markup attributes
    "SRC", "ALT", "DIV", "SPAN",
];

/// ISO-style language codes that surface in page chrome ("lang=EN")
const LANGUAGE_CODES: &[&str] = &[
    "EN", "FR", "DE", "ES", "IT", "PT", "NL", "RU", "ZH", "JA", "KO",
    "AR", "HI", "TR", "PL", "CS", "HU", "RO", "BG", "HR", "SK", "SL",
    "ET", "LV", "LT", "MT", "DA", "SV", "FI", "NO", "IS", "GA", "CY",
];

/// ISO-style country codes
const COUNTRY_CODES: &[&str] = &[
    "US", "UK", "CA", "AU", "NZ", "IE", "ZA", "IN", "CN", "JP", "KR",
    "BR", "MX", "AR", "CL", "PE", "CO", "VE", "UY", "PY", "BO", "EC",
    "FR", "DE", "ES", "IT", "PT", "NL", "BE", "LU", "CH", "AT", "SE",
    "DK", "NO", "FI", "IS", "MT", "CY", "GR", "BG", "RO", "HU",
    "CZ", "SK", "PL", "SI", "HR", "EE", "LV", "LT",
];

/// Phrases that mark genuine stock context around a token
const STRONG_STOCK_INDICATORS: &[&str] = &[
    "ticker symbol", "stock symbol", "trading symbol", "stock ticker",
    "shares of", "stock code", "equity symbol", "listed as",
    "trades as", "symbol:", "ticker:",
];

// Precise patterns: explicit labeling idioms, uppercase tokens only
static RE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:ticker|stock\s+symbol|trading\s+symbol)[\s:]+([A-Z]{2,5})\b").unwrap()
});
static RE_PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\(([A-Z]{2,5})\)").unwrap());
static RE_EXCHANGE_PREFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i:NYSE|NASDAQ)[\s:]+([A-Z]{2,5})\b").unwrap());

// Contextual patterns: looser, only applied inside keyword windows
static RE_CTX_TRAILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z]{2,5})\b(?:\s*[:\-]|\s+(?i:stock|shares|ticker|symbol))").unwrap()
});
static RE_CTX_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i:ticker|symbol)[\s:]+([A-Z]{2,5})\b").unwrap());
static RE_CTX_PARENTHESIZED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Z]{2,5})\)").unwrap());

// Phrasing that points away from the company under discussion
static RE_MISLEADING: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:not|no|incorrect|wrong|error|mistake)\s+(?:ticker|symbol)",
        r"(?i)(?:different|other|another)\s+(?:company|corporation)",
        r"(?i)(?:formerly|previously|old)\s+(?:known|called)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Extract deduplicated ticker candidates from retrieved text,
/// most-likely-first.
pub fn extract_candidates(content: &str, company_name: &str) -> Vec<String> {
    let keywords = extract_keywords(company_name);

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();

    for re in [&*RE_LABELED, &*RE_PARENTHESIZED, &*RE_EXCHANGE_PREFIXED] {
        for caps in re.captures_iter(content) {
            let token = caps[1].to_string();
            if is_valid_ticker_strict(&token, content) && seen.insert(token.clone()) {
                log::debug!("Precise pattern matched candidate: {}", token);
                candidates.push(token);
            }
        }
    }

    if candidates.is_empty() {
        for token in contextual_candidates(content, &keywords) {
            if seen.insert(token.clone()) {
                candidates.push(token);
            }
        }
    }

    candidates.retain(|token| {
        !is_obviously_invalid(token) && candidate_relevance(token, &keywords, content)
    });

    // Empirical ticker-length distribution: 3 letters first, then 4,
    // then 2, then 5
    candidates.sort_by_key(|token| length_priority(token));

    log::debug!("Filtered candidates for '{}': {:?}", company_name, candidates);
    candidates
}

/// Looser extraction inside ±100-char windows around each keyword occurrence.
fn contextual_candidates(content: &str, keywords: &[String]) -> Vec<String> {
    let folded = content.to_ascii_lowercase();
    let mut seen: HashSet<String> = HashSet::new();
    let mut found = Vec::new();

    for keyword in keywords {
        let needle = keyword.to_ascii_lowercase();
        for (pos, _) in folded.match_indices(&needle) {
            let window = clamp_window(content, pos, 100, needle.len() + 100);

            for re in [&*RE_CTX_TRAILING, &*RE_CTX_LABELED, &*RE_CTX_PARENTHESIZED] {
                for caps in re.captures_iter(window) {
                    let token = caps[1].to_string();
                    if is_valid_ticker_strict(&token, window) && seen.insert(token.clone()) {
                        log::debug!("Contextual pattern matched candidate: {}", token);
                        found.push(token);
                    }
                }
            }
        }
    }

    found
}

/// Basic shape check: 1–5 uppercase ASCII letters and not in the static
/// invalid list.
pub fn is_valid_ticker(token: &str) -> bool {
    (1..=5).contains(&token.len())
        && token.chars().all(|c| c.is_ascii_uppercase())
        && !is_obviously_invalid(token)
}

/// Strict candidate validation: 2–5 uppercase letters, not a known
/// false positive, not a language/country code, and appearing in strong
/// stock context within the given text.
pub fn is_valid_ticker_strict(token: &str, content: &str) -> bool {
    if !(2..=5).contains(&token.len()) || !token.chars().all(|c| c.is_ascii_uppercase()) {
        return false;
    }
    if is_obviously_invalid(token) || is_language_or_country_code(token) {
        return false;
    }
    in_strong_stock_context(token, content)
}

/// Static rejection list plus domain-suffix and HTML-tag shapes.
pub fn is_obviously_invalid(token: &str) -> bool {
    if OBVIOUS_INVALID.contains(&token) {
        return true;
    }

    // Fragments of domain names
    if token.ends_with("COM") || token.ends_with("NET") {
        return true;
    }

    is_html_tag_shape(token)
}

fn is_html_tag_shape(token: &str) -> bool {
    if token.len() == 2 {
        let mut chars = token.chars();
        if chars.next() == Some('H') && matches!(chars.next(), Some('1'..='6')) {
            return true;
        }
    }

    matches!(
        token,
        "BR" | "HR" | "TD" | "TR" | "TH" | "LI" | "UL" | "OL"
            | "DIV" | "SPAN" | "FONT" | "BOLD"
            | "SRC" | "ALT" | "REF" | "REL"
    )
}

fn is_language_or_country_code(token: &str) -> bool {
    LANGUAGE_CODES.contains(&token) || COUNTRY_CODES.contains(&token)
}

/// A token only counts when it sits within ±50 chars of a strong stock
/// phrase, or directly inside a parenthesis pair.
fn in_strong_stock_context(token: &str, content: &str) -> bool {
    let folded = content.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();

    for (pos, _) in folded.match_indices(&needle) {
        let start = window_start(&folded, pos, 50);
        let window = clamp_window(&folded, pos, 50, needle.len() + 50);

        if STRONG_STOCK_INDICATORS
            .iter()
            .any(|indicator| window.contains(indicator))
        {
            return true;
        }

        // Parenthesized-after-name form: an opening paren before the token
        // and a closing one after it, both inside the window
        let token_offset = pos - start;
        if window[..token_offset].contains('(') && window[token_offset..].contains(')') {
            return true;
        }
    }

    false
}

/// Relevance: at least half of the company's keywords — minimum one — must
/// co-occur within ±150 chars of some occurrence of the token.
fn candidate_relevance(token: &str, keywords: &[String], content: &str) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let required = (keywords.len() / 2).max(1);

    let folded = content.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();

    for (pos, _) in folded.match_indices(&needle) {
        let window = clamp_window(&folded, pos, 150, needle.len() + 150);
        let matches = keywords
            .iter()
            .filter(|kw| window.contains(&kw.to_ascii_lowercase()))
            .count();
        if matches >= required {
            return true;
        }
    }

    false
}

/// Looser context gate used by the regulatory-search path and as a web-search
/// pre-check: keyword adjacency within ±200 chars (with a paragraph-level
/// fallback), then a scan for misleading phrasing.
pub fn validate_ticker_context(token: &str, company_name: &str, content: &str) -> bool {
    if !is_valid_ticker(token) {
        return false;
    }

    let keywords = extract_keywords(company_name);
    if keywords.is_empty() {
        return false;
    }
    let required = if keywords.len() == 1 {
        1
    } else {
        (keywords.len() / 2).max(1)
    };

    let folded = content.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();

    let mut keyword_matches = 0;
    for keyword in &keywords {
        let kw_lower = keyword.to_ascii_lowercase();
        if !folded.contains(&kw_lower) {
            continue;
        }
        let near_token = folded.match_indices(&needle).any(|(pos, _)| {
            clamp_window(&folded, pos, 200, needle.len() + 200).contains(&kw_lower)
        });
        if near_token {
            keyword_matches += 1;
        }
    }

    log::debug!(
        "Keyword adjacency for {}: {}/{} (required {})",
        token,
        keyword_matches,
        keywords.len(),
        required
    );

    if keyword_matches >= required {
        return !has_misleading_context(content);
    }

    // Paragraph fallback: token and at least one keyword in the same
    // blank-line-delimited block
    for paragraph in folded.split("\n\n") {
        if paragraph.contains(&needle)
            && keywords
                .iter()
                .any(|kw| paragraph.contains(&kw.to_ascii_lowercase()))
        {
            return !has_misleading_context(paragraph);
        }
    }

    false
}

fn has_misleading_context(content: &str) -> bool {
    for re in RE_MISLEADING.iter() {
        if re.is_match(content) {
            log::debug!("Misleading phrasing found: {}", re.as_str());
            return true;
        }
    }
    false
}

/// Short context snippet around the first occurrence of a token, for
/// candidate records and logging.
pub fn context_snippet(content: &str, token: &str) -> String {
    let folded = content.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();
    match folded.find(&needle) {
        Some(pos) => clamp_window(content, pos, 80, needle.len() + 80)
            .trim()
            .to_string(),
        None => String::new(),
    }
}

/// Sort key reflecting how common each ticker length is in practice.
fn length_priority(token: &str) -> u8 {
    match token.len() {
        3 => 0,
        4 => 1,
        2 => 2,
        _ => 3,
    }
}

fn window_start(content: &str, center: usize, before: usize) -> usize {
    let mut start = center.saturating_sub(before);
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    start
}

/// Byte window around `center`, clamped to char boundaries.
fn clamp_window(content: &str, center: usize, before: usize, after: usize) -> &str {
    let start = window_start(content, center, before);
    let mut end = (center + after).min(content.len());
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }
    &content[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_pattern_extraction() {
        let content = "Allergan plc, ticker symbol: AGN, closed higher today.";
        let candidates = extract_candidates(content, "Allergan plc");
        assert_eq!(candidates, vec!["AGN"]);
    }

    #[test]
    fn test_parenthesized_extraction() {
        let content = "Shares of Allergan (AGN) rose after the announcement.";
        let candidates = extract_candidates(content, "Allergan plc");
        assert_eq!(candidates, vec!["AGN"]);
    }

    #[test]
    fn test_exchange_prefixed_extraction() {
        let content = "Allergan, which trades as NYSE: AGN, fell sharply.";
        let candidates = extract_candidates(content, "Allergan plc");
        assert_eq!(candidates, vec!["AGN"]);
    }

    #[test]
    fn test_static_false_positives_rejected_unconditionally() {
        let content = "ticker symbol: NASDAQ and stock symbol: HTML and ticker: NEWS";
        for token in ["NASDAQ", "HTML", "NEWS"] {
            assert!(!is_valid_ticker_strict(token, content), "{} accepted", token);
        }
        assert!(extract_candidates(content, "Nasdaq Html News Inc").is_empty());
    }

    #[test]
    fn test_country_code_rejected() {
        let content = "ticker symbol: DE appears in stock context";
        assert!(!is_valid_ticker_strict("DE", content));
    }

    #[test]
    fn test_token_without_stock_context_rejected() {
        let content = "XYZQ is mentioned here without any market phrasing at all.";
        assert!(!is_valid_ticker_strict("XYZQ", content));
    }

    #[test]
    fn test_three_letter_candidates_ordered_first() {
        let content = "Monsanto Company stock symbol: MONS. Monsanto trading symbol: MON.";
        let candidates = extract_candidates(content, "Monsanto Company");
        assert_eq!(candidates.first().map(String::as_str), Some("MON"));
        assert!(candidates.contains(&"MONS".to_string()));
    }

    #[test]
    fn test_two_letter_before_five_letter() {
        assert!(length_priority("AB") < length_priority("ABCDE"));
        assert!(length_priority("ABC") < length_priority("ABCD"));
    }

    #[test]
    fn test_relevance_filter_drops_unrelated_token() {
        // Valid shape and stock context, but none of the company's keywords
        // anywhere near it
        let content = "Some outlet wrote: trading symbol: QRST today.";
        let candidates = extract_candidates(content, "Monsanto Company");
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_contextual_fallback_used_when_precise_fails() {
        // No space before the paren, so the precise parenthesized pattern
        // misses and the keyword-window fallback has to find the token
        let content = "Monsanto shares(MON) gained three percent in late trading.";
        let candidates = extract_candidates(content, "Monsanto Company");
        assert_eq!(candidates, vec!["MON"]);
    }

    #[test]
    fn test_validate_ticker_context_requires_keyword_adjacency() {
        let near = "Exxon Mobil Corporation (NYSE: XOM) reported earnings.";
        assert!(validate_ticker_context("XOM", "Exxon Mobil Corp", near));

        // Token and keywords in separate paragraphs, far apart
        let far = format!("XOM\n\n{}\n\nExxon Mobil Corporation", "y".repeat(600));
        assert!(!validate_ticker_context("XOM", "Exxon Mobil Corp", &far));
    }

    #[test]
    fn test_validate_ticker_context_rejects_misleading_phrasing() {
        let content = "Monsanto ticker MON is the wrong ticker for this company.";
        assert!(!validate_ticker_context("MON", "Monsanto Company", content));
    }

    #[test]
    fn test_html_tag_shapes_rejected() {
        for token in ["H1", "H6", "TD", "DIV", "SPAN", "SRC"] {
            assert!(is_obviously_invalid(token), "{} accepted", token);
        }
        assert!(is_obviously_invalid("SITECOM"));
        assert!(!is_obviously_invalid("AGN"));
    }

    #[test]
    fn test_clamp_window_respects_char_boundaries() {
        let content = "ümlaut (AGN) ümlaut ticker symbol context ümlaut";
        // Must not panic on any center position
        for pos in 0..content.len() {
            let _ = clamp_window(content, pos, 10, 10);
        }
    }
}
