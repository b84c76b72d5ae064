//! Local registry lookup
//!
//! Scores an input name against every registry entry, ranks the survivors
//! and applies a plausibility gate to the best match. Character similarity
//! alone produces convincing false positives (acronym collisions like
//! ARGAN/ALLERGAN); the gate cross-checks keyword overlap and name lengths
//! before a local match is accepted.
//!
//! An empty return value means "no trustworthy local match" and sends the
//! caller into the online waterfall.

use std::collections::HashSet;

use crate::matching::{extract_keywords, normalize, similarity};
use crate::models::RegistryEntry;
use crate::registry::Registry;

/// Minimum similarity for an entry to enter the candidate list at all
pub const LOCAL_MATCH_THRESHOLD: f64 = 0.75;

/// Search the registry for an input name.
///
/// Returns the gated, descending-ranked `(entry, score)` list. Empty when no
/// entry clears `threshold`, or when the top match fails the plausibility
/// gate.
pub fn search_local<'a>(
    registry: &'a Registry,
    company_name: &str,
    threshold: f64,
) -> Vec<(&'a RegistryEntry, f64)> {
    let mut results: Vec<(&RegistryEntry, f64)> = registry
        .entries()
        .iter()
        .filter_map(|entry| {
            let score = similarity(company_name, &entry.name);
            (score >= threshold).then_some((entry, score))
        })
        .collect();

    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(&(best_entry, best_score)) = results.first() {
        if !passes_plausibility_gate(company_name, best_entry, best_score) {
            return Vec::new();
        }

        if best_score < 0.85 {
            log::warn!(
                "Best local match for '{}' has low similarity ({:.2})",
                company_name,
                best_score
            );
            if best_score < 0.80 {
                log::warn!("Similarity too low, skipping local match for '{}'", company_name);
                return Vec::new();
            }
        }
    }

    results
}

/// Cross-check the top match beyond its raw similarity score.
fn passes_plausibility_gate(company_name: &str, best: &RegistryEntry, score: f64) -> bool {
    let input_keywords: HashSet<String> = extract_keywords(company_name).into_iter().collect();
    let match_keywords: HashSet<String> = extract_keywords(&best.name).into_iter().collect();
    let overlap = input_keywords.intersection(&match_keywords).count();

    if overlap == 0 {
        // High character similarity with zero shared meaningful words is an
        // acronym collision until proven otherwise
        if score > 0.8 {
            log::warn!(
                "Rejecting suspicious local match '{}' for '{}': similarity {:.2} but no keyword overlap ({:?} vs {:?})",
                best.name,
                company_name,
                score,
                input_keywords,
                match_keywords
            );
            return false;
        }

        let norm_input = normalize(company_name);
        let norm_match = normalize(&best.name);
        let max_len = norm_input.chars().count().max(norm_match.chars().count());
        let len_similarity = if max_len > 0 {
            let diff = norm_input.chars().count().abs_diff(norm_match.chars().count());
            1.0 - diff as f64 / max_len as f64
        } else {
            0.0
        };

        if len_similarity < 0.5 && score > 0.7 {
            log::warn!(
                "Rejecting local match '{}' for '{}': lengths too far apart (length similarity {:.2}, score {:.2})",
                best.name,
                company_name,
                len_similarity,
                score
            );
            return false;
        }
    }

    true
}
