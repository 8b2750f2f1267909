//! Token-sorted fuzzy similarity between two text blobs
//!
//! Both sides are lower-cased, split on whitespace, sorted and re-joined
//! before an edit-distance ratio is taken, so shared vocabulary counts the
//! same regardless of word order.

use crate::processing::text_processor::token_sort;
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// Edit-distance ratio applied to the token-sorted strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// `1 - indel / (len_a + len_b)`, insertions and deletions only
    #[default]
    Indel,
    /// `1 - levenshtein / max(len_a, len_b)`
    Levenshtein,
}

impl SimilarityMetric {
    pub fn ratio(self, a: &str, b: &str) -> f32 {
        let ratio = match self {
            SimilarityMetric::Indel => indel_ratio(a, b),
            SimilarityMetric::Levenshtein => normalized_levenshtein(a, b),
        };
        (ratio as f32).clamp(0.0, 1.0)
    }
}

/// Similarity in [0, 1] using the default metric
pub fn similarity(text_a: &str, text_b: &str) -> f32 {
    similarity_with(SimilarityMetric::default(), text_a, text_b)
}

pub fn similarity_with(metric: SimilarityMetric, text_a: &str, text_b: &str) -> f32 {
    if text_a.is_empty() || text_b.is_empty() {
        return 0.0;
    }

    let sorted_a = token_sort(text_a);
    let sorted_b = token_sort(text_b);
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0.0;
    }

    metric.ratio(&sorted_a, &sorted_b)
}

/// Normalized indel similarity: `2 * lcs / (len_a + len_b)` over chars.
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let lcs = lcs_length(&a, &b);
    (2 * lcs) as f64 / total as f64
}

/// Longest common subsequence length with a two-row table.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    // Common prefix and suffix never change the result, strip them first.
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a, b) = (&a[..a.len() - suffix], &b[..b.len() - suffix]);

    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut previous = vec![0u32; inner.len() + 1];
    let mut current = vec![0u32; inner.len() + 1];

    for &oc in outer {
        for (j, &ic) in inner.iter().enumerate() {
            current[j + 1] = if oc == ic {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    prefix + suffix + previous[inner.len()] as usize
}
