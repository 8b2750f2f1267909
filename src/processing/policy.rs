//! Calibration constants for ranking

use crate::processing::evidence::SnippetWindow;
use crate::processing::records::MatchResult;
use crate::processing::similarity::SimilarityMetric;

/// Minimum score a candidate must exceed to be reported. Fixed.
pub const MATCH_THRESHOLD: f32 = 0.10;

pub const SKILLS_WEIGHT: f32 = 0.7;
pub const FULL_TEXT_WEIGHT: f32 = 0.3;

pub const MAX_EVIDENCE_SNIPPETS: usize = 3;

pub const QUERY_SNIPPET_WINDOW: SnippetWindow = SnippetWindow::new(50, 100, 10);
pub const REQUIREMENT_SNIPPET_WINDOW: SnippetWindow = SnippetWindow::new(30, 80, 0);

/// Phrases marking a sentence as a hard requirement, in priority order.
pub const REQUIREMENT_MARKERS: &[&str] = &["required", "must have", "essential"];

/// Scoring policy shared by the query and requirement matchers
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPolicy {
    pub metric: SimilarityMetric,
    pub skills_weight: f32,
    pub full_text_weight: f32,
    pub max_snippets: usize,
    pub query_window: SnippetWindow,
    pub requirement_window: SnippetWindow,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::default(),
            skills_weight: SKILLS_WEIGHT,
            full_text_weight: FULL_TEXT_WEIGHT,
            max_snippets: MAX_EVIDENCE_SNIPPETS,
            query_window: QUERY_SNIPPET_WINDOW,
            requirement_window: REQUIREMENT_SNIPPET_WINDOW,
        }
    }
}

impl MatchPolicy {
    pub fn threshold(&self) -> f32 {
        MATCH_THRESHOLD
    }

    /// Snippets kept per result, never above `MAX_EVIDENCE_SNIPPETS`
    pub fn snippet_limit(&self) -> usize {
        self.max_snippets.min(MAX_EVIDENCE_SNIPPETS)
    }

    pub fn passes(&self, score: f32) -> bool {
        score > MATCH_THRESHOLD
    }

    /// Weighted blend of skills-only and full-text similarity
    pub fn composite(&self, skills_score: f32, full_score: f32) -> f32 {
        let score = self.skills_weight * skills_score + self.full_text_weight * full_score;
        if score.is_finite() {
            score.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Sort by score, highest first. Stable: equal scores keep input order.
pub fn rank_descending(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
