//! Query normalization, keying, and lexical similarity

use sha2::{Digest, Sha256};

/// Normalize a query for keying and comparison: trim and lowercase.
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Stable content key: hex SHA-256 of the normalized query.
///
/// Two queries that normalize identically always map to the same key.
pub fn key_for(query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(query).as_bytes());
    hex::encode(hasher.finalize())
}

/// Symmetric, length-weighted similarity ratio in [0, 1].
///
/// `2 * LCS(a, b) / (|a| + |b|)` over characters, so transposed or
/// reworded queries score below identical ones but case and whitespace
/// variants (after normalization) score 1.0. Two empty strings are
/// considered identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&a_chars, &b_chars);
    (2.0 * lcs as f64) / (a_chars.len() + b_chars.len()) as f64
}

/// Longest common subsequence length, two-row dynamic programming.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_queries_share_a_key() {
        assert_eq!(key_for("Craft a Sword"), key_for("  craft a sword  "));
    }

    #[test]
    fn test_distinct_queries_have_distinct_keys() {
        assert_ne!(key_for("craft a sword"), key_for("craft a shield"));
    }

    #[test]
    fn test_identical_strings_score_one() {
        assert!((similarity_ratio("craft a sword", "craft a sword") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_small_variation_scores_high() {
        let ratio = similarity_ratio(
            &normalize("craft a diamond sword"),
            &normalize("craft a Diamond sword "),
        );
        assert!(ratio >= 0.85, "ratio was {ratio}");
    }

    #[test]
    fn test_unrelated_queries_score_low() {
        let ratio = similarity_ratio("how to smelt iron", "how do i brew a potion");
        assert!(ratio < 0.85, "ratio was {ratio}");
    }

    #[test]
    fn test_empty_strings() {
        assert!((similarity_ratio("", "") - 1.0).abs() < 1e-9);
        assert_eq!(similarity_ratio("", "x"), 0.0);
    }

    #[test]
    fn test_ratio_is_symmetric() {
        let ab = similarity_ratio("enchanting table", "crafting table");
        let ba = similarity_ratio("crafting table", "enchanting table");
        assert!((ab - ba).abs() < 1e-9);
    }
}
