//! Company-name similarity scoring
//!
//! Implements the Ratcliff/Obershelp sequence ratio plus length and
//! containment gates on top of it. Naive edit-distance ratios over-reward
//! short names with spurious character overlap ("ARGAN" vs "ALLERGAN"); the
//! gates suppress exactly that failure mode.

use super::normalizer::normalize;

/// Score two company names, 0.0 (unrelated) to 1.0 (identical after
/// normalization).
///
/// Both names are normalized first. Names whose lengths differ by more than
/// 30% are penalized proportionally; a true containment (one normalized name
/// inside the other, with at least 70% of the longer one's length) scores a
/// flat 0.9 — strong, but never perfect, so distinct entities sharing a root
/// stay distinguishable.
pub fn similarity(name_a: &str, name_b: &str) -> f64 {
    let norm_a = normalize(name_a);
    let norm_b = normalize(name_b);

    if norm_a == norm_b {
        return 1.0;
    }

    if !norm_a.is_empty() && !norm_b.is_empty() {
        let len_a = norm_a.chars().count();
        let len_b = norm_b.chars().count();
        let max_len = len_a.max(len_b) as f64;
        let len_diff = len_a.abs_diff(len_b) as f64;

        if len_diff > max_len * 0.3 {
            let base = sequence_ratio(&norm_a, &norm_b);
            return base * (1.0 - len_diff / max_len);
        }

        if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
            let (shorter, longer) = if len_a < len_b {
                (len_a as f64, len_b as f64)
            } else {
                (len_b as f64, len_a as f64)
            };

            if shorter >= longer * 0.7 {
                return 0.9;
            }
            return sequence_ratio(&norm_a, &norm_b) * 0.8;
        }
    }

    sequence_ratio(&norm_a, &norm_b)
}

/// Ratcliff/Obershelp similarity ratio between two raw strings.
///
/// `2 * M / (len_a + len_b)` where `M` is the total length of the matching
/// blocks found by recursively locating the longest common substring and
/// matching the pieces to its left and right.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();

    let total = chars_a.len() + chars_b.len();
    if total == 0 {
        return 1.0;
    }

    let matches = matching_chars(&chars_a, &chars_b);
    2.0 * matches as f64 / total as f64
}

/// Total characters covered by the recursive longest-common-substring
/// decomposition of the two sequences.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (start_a, start_b, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }

    len + matching_chars(&a[..start_a], &b[..start_b])
        + matching_chars(&a[start_a + len..], &b[start_b + len..])
}

/// Longest common contiguous block of the two sequences.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    if a.is_empty() || b.is_empty() {
        return best;
    }

    // lengths[j] = length of the common block ending at a[i - 1] / b[j - 1]
    let mut lengths = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        // Walk right-to-left so the previous row is still intact
        for j in (0..b.len()).rev() {
            if a[i] == b[j] {
                let run = lengths[j] + 1;
                lengths[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            } else {
                lengths[j + 1] = 0;
            }
        }
        lengths[0] = 0;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_identical_names_score_one() {
        assert_eq!(similarity("Apple Inc.", "Apple Inc."), 1.0);
        assert_eq!(similarity("Apple Inc.", "APPLE INC"), 1.0);
        assert_eq!(similarity("Microsoft Corp", "Microsoft Corporation"), 1.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let pairs = [
            ("Apple Inc.", "Microsoft Corporation"),
            ("ARGAN INC", "ALLERGAN PLC"),
            ("", "General Electric Co"),
            ("X", "Y"),
            ("E M C CORP MASS", "EMC Corp"),
        ];
        for (a, b) in pairs {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{} vs {} -> {}", a, b, score);
        }
    }

    #[test]
    fn test_score_is_symmetric() {
        let pairs = [
            ("ARGAN INC", "ALLERGAN PLC"),
            ("Apple Inc.", "Apple Computer Inc"),
            ("General Dynamics Corp", "General Electric Co"),
            ("E M C CORP MASS", "EMC Corp"),
            ("Goldman Sachs Group Inc", "Goldman Sachs"),
        ];
        for (a, b) in pairs {
            let forward = similarity(a, b);
            let backward = similarity(b, a);
            assert!(
                (forward - backward).abs() < EPSILON,
                "{} vs {}: {} != {}",
                a,
                b,
                forward,
                backward
            );
        }
    }

    #[test]
    fn test_length_mismatch_is_penalized() {
        // "ALLERGAN" vs "ARGAN": raw ratio is deceptively high, the length
        // penalty pulls it below any acceptance threshold
        let score = similarity("ALLERGAN", "ARGAN");
        let raw = sequence_ratio("ALLERGAN", "ARGAN");
        assert!(score < raw);
        assert!(score < 0.75, "got {}", score);
    }

    #[test]
    fn test_containment_scores_point_nine() {
        // "GOLDMAN SACH" is contained in "GOLDMAN SACHS" and covers >= 70%
        let score = similarity("Goldman Sachs", "Goldman Sach");
        assert!((score - 0.9).abs() < EPSILON, "got {}", score);
    }

    #[test]
    fn test_sequence_ratio_reference_values() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("ABCD", "ABCD"), 1.0);
        assert_eq!(sequence_ratio("ABCD", "WXYZ"), 0.0);
        // "ABCD" vs "BCDE": block "BCD" -> 2*3/8
        assert!((sequence_ratio("ABCD", "BCDE") - 0.75).abs() < EPSILON);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(similarity("Apple Inc.", "Exxon Mobil Corp") < 0.5);
    }
}
