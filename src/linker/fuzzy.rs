//! Name similarity scores on a 0-100 scale.
//!
//! `ratio` is the indel edit-distance ratio used by fuzzywuzzy's `fuzz.ratio`;
//! the other metrics wrap strsim.

use clap::ValueEnum;
use serde::Serialize;
use strsim::{jaro_winkler, normalized_levenshtein};

/// Highest possible score (identical names).
pub const MAX_SCORE: u8 = 100;

/// Similarity metric used to score a pair of names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Indel edit-distance ratio (substitution costs 2)
    #[default]
    Ratio,
    /// Normalized Levenshtein distance
    Levenshtein,
    /// Jaro-Winkler similarity
    JaroWinkler,
    /// Ratio over normalized, sorted tokens (handles word order)
    TokenSort,
}

/// Scores names with one metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    pub metric: Metric,
    pub ignore_case: bool,
}

impl Scorer {
    pub fn new(metric: Metric, ignore_case: bool) -> Self {
        Self { metric, ignore_case }
    }

    /// Score two names. Empty names never match anything.
    pub fn score(&self, a: &str, b: &str) -> u8 {
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        if self.ignore_case {
            self.score_raw(&a.to_lowercase(), &b.to_lowercase())
        } else {
            self.score_raw(a, b)
        }
    }

    fn score_raw(&self, a: &str, b: &str) -> u8 {
        match self.metric {
            Metric::Ratio => ratio(a, b),
            Metric::Levenshtein => to_score(normalized_levenshtein(a, b)),
            Metric::JaroWinkler => to_score(jaro_winkler(a, b)),
            Metric::TokenSort => token_sort_ratio(a, b),
        }
    }
}

/// Indel ratio: `2 * lcs / (len(a) + len(b))`, scaled to 0-100.
///
/// Lengths count chars. Either string empty scores 0.
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let total = a.len() + b.len();
    let common = lcs_len(&a, &b);
    to_score(2.0 * common as f64 / total as f64)
}

/// Token sort ratio - normalize and sort words before comparing.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Lowercase, turn anything but letters, digits and `_` into spaces, then
/// sort the whitespace-separated tokens.
fn sorted_tokens(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .to_lowercase();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Length of the longest common subsequence.
fn lcs_len(a: &[char], b: &[char]) -> usize {
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

/// Map a 0.0-1.0 similarity to 0-100, rounding halves away from zero.
fn to_score(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_names_score_100() {
        assert_eq!(ratio("Acme Corp", "Acme Corp"), MAX_SCORE);
    }

    #[test]
    fn test_ratio_known_values() {
        // lcs 9, total 25
        assert_eq!(ratio("Acme Corporation", "Acme Corp"), 72);
        // lcs 7, total 23 -> 60.87
        assert_eq!(ratio("Acme Corporation", "Acme Co"), 61);
        assert_eq!(ratio("abc", "xyz"), 0);
    }

    #[test]
    fn test_ratio_rounds_half_up() {
        // lcs 1, total 8 -> 25.0
        assert_eq!(ratio("abcd", "aefg"), 25);
        // lcs 1, total 16 -> 12.5
        assert_eq!(ratio("abcdefgh", "aijklmno"), 13);
        // lcs 5, total 16 -> 62.5
        assert_eq!(ratio("abcdefgh", "abcdexyz"), 63);
    }

    #[test]
    fn test_ratio_counts_chars_not_bytes() {
        assert_eq!(ratio("Société", "Société"), MAX_SCORE);
        assert_eq!(ratio("é", "e"), 0);
    }

    #[test]
    fn test_empty_names_score_zero() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score("", ""), 0);
        assert_eq!(scorer.score("Acme", ""), 0);
    }

    #[test]
    fn test_case_is_significant_unless_ignored() {
        let strict = Scorer::new(Metric::Ratio, false);
        let folded = Scorer::new(Metric::Ratio, true);
        assert!(strict.score("ACME", "acme") < MAX_SCORE);
        assert_eq!(folded.score("ACME", "acme"), MAX_SCORE);
    }

    #[test]
    fn test_token_sort_ignores_word_order_and_punctuation() {
        assert_eq!(token_sort_ratio("Corp, Acme", "acme corp"), MAX_SCORE);
    }

    #[test]
    fn test_strsim_metrics_are_scaled() {
        let lev = Scorer::new(Metric::Levenshtein, false);
        let jw = Scorer::new(Metric::JaroWinkler, false);
        assert_eq!(lev.score("kitten", "kitten"), MAX_SCORE);
        // 1 - 3/7
        assert_eq!(lev.score("kitten", "sitting"), 57);
        assert!(jw.score("Acme Corp", "Acme Corporation") > 80);
    }
}
