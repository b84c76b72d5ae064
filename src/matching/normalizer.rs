//! Company-name canonicalization
//!
//! Filing names are noisy: legal suffixes, punctuation variants, trailing
//! state-of-incorporation markers and spaced-out abbreviations
//! ("E M C CORP MASS" for EMC). All comparisons run on the normalized form
//! so the similarity thresholds stay meaningful.

/// Legal-form and structure words stripped from names before comparison.
/// "NEW" marks re-listed issuers after a rename and carries no identity.
const COMPANY_SUFFIXES: &[&str] = &[
    "INC", "CORP", "CORPORATION", "LTD", "LIMITED", "LLC", "LP", "LLP",
    "CO", "COMPANY", "HOLDINGS", "GROUP", "ENTERPRISES", "SYSTEMS",
    "TECHNOLOGIES", "TECH", "SOLUTIONS", "SERVICES", "INTERNATIONAL",
    "PLC", "SA", "NV", "AG", "GMBH", "SPA", "BV", "NEW",
];

/// State-of-incorporation markers that trail filing names ("EMC CORP MASS").
/// Only stripped from the end of a name; words like "DEL" are legitimate
/// leading name parts ("DEL TACO").
const STATE_MARKERS: &[&str] = &[
    "MASS", "DEL", "CALIF", "CAL", "CONN", "MICH", "WIS", "MINN", "PENN",
    "OHIO", "TEX", "WASH", "FLA", "COLO", "ILL", "IND", "ORE", "MD", "VA",
    "GA", "NC", "NJ", "NY", "PA",
];

/// Filler words ignored when extracting keywords
const STOP_WORDS: &[&str] = &[
    "THE", "OF", "AND", "OR", "FOR", "WITH", "A", "AN", "AT", "BY", "IN", "ON",
];

fn is_company_suffix(word: &str) -> bool {
    COMPANY_SUFFIXES.contains(&word)
}

fn is_state_marker(word: &str) -> bool {
    STATE_MARKERS.contains(&word)
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Uppercase, map punctuation to spaces, split into words.
fn tokenize(name: &str, strip_parens: bool) -> Vec<String> {
    let upper: String = name
        .trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            '.' | ',' | '&' | '-' | '/' => ' ',
            '(' | ')' if strip_parens => ' ',
            u => u,
        })
        .collect();

    upper.split_whitespace().map(|w| w.to_string()).collect()
}

/// Collapse runs of two or more single-letter words into one word, so
/// "E M C" compares equal to "EMC". A lone single letter ("CLASS A") stays.
fn merge_single_letter_runs(words: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(words.len());
    let mut run = String::new();
    let mut run_len = 0usize;

    for word in words {
        if word.len() == 1 && word.chars().all(|c| c.is_ascii_alphabetic()) {
            run.push_str(&word);
            run_len += 1;
            continue;
        }
        flush_run(&mut merged, &mut run, &mut run_len);
        merged.push(word);
    }
    flush_run(&mut merged, &mut run, &mut run_len);
    merged
}

fn flush_run(out: &mut Vec<String>, run: &mut String, run_len: &mut usize) {
    if *run_len > 0 {
        out.push(std::mem::take(run));
        *run_len = 0;
    }
}

/// Shared normalization pipeline: suffix words out, trailing state markers
/// off, spaced abbreviations merged.
fn normalized_words(name: &str, strip_parens: bool) -> Vec<String> {
    let mut words: Vec<String> = tokenize(name, strip_parens)
        .into_iter()
        .filter(|word| !is_company_suffix(word))
        .collect();

    while let Some(last) = words.last() {
        if is_state_marker(last) {
            words.pop();
        } else {
            break;
        }
    }

    merge_single_letter_runs(words)
}

/// Canonicalize a company name for comparison.
///
/// Uppercases, maps `.`, `,`, `&`, `-`, `/` to spaces, collapses whitespace,
/// drops every whole word in the legal-suffix vocabulary, strips trailing
/// state-of-incorporation markers and merges spaced single-letter runs.
/// Pure and idempotent; never fails.
pub fn normalize(name: &str) -> String {
    normalized_words(name, false).join(" ")
}

/// Extract the meaningful keywords of a company name.
///
/// Same stripping as [`normalize`], but parentheses are also mapped to
/// spaces and short tokens plus stop words are dropped. Used for plausibility
/// gating and context-relevance checks, not for primary scoring.
pub fn extract_keywords(name: &str) -> Vec<String> {
    normalized_words(name, true)
        .into_iter()
        .filter(|word| word.len() >= 2 && !is_stop_word(word))
        .collect()
}
