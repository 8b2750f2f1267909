//! Free-text query ranking over candidate records

use crate::processing::evidence::FoldedText;
use crate::processing::policy::{rank_descending, MatchPolicy};
use crate::processing::records::{CandidateRecord, MatchResult};
use crate::processing::similarity::similarity_with;
use crate::processing::text_processor::whitespace_tokens;
use log::{debug, warn};
use rayon::prelude::*;

/// Ranks candidates against a free-text query
#[derive(Debug, Clone, Default)]
pub struct QueryMatcher {
    policy: MatchPolicy,
}

impl QueryMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// Score every candidate, drop those at or below the threshold and
    /// return the survivors best first. Truncation is left to the caller.
    pub fn match_query(&self, query: &str, candidates: &[CandidateRecord]) -> Vec<MatchResult> {
        if query.trim().is_empty() {
            debug!("Empty query, nothing to match");
            return Vec::new();
        }

        let query_tokens = whitespace_tokens(query);

        let mut results: Vec<MatchResult> = candidates
            .par_iter()
            .filter_map(|candidate| self.score_candidate(query, &query_tokens, candidate))
            .collect();

        rank_descending(&mut results);
        debug!(
            "Query '{}' matched {} of {} candidates",
            query,
            results.len(),
            candidates.len()
        );
        results
    }

    fn score_candidate(
        &self,
        query: &str,
        query_tokens: &[String],
        candidate: &CandidateRecord,
    ) -> Option<MatchResult> {
        if !candidate.is_well_formed() {
            warn!("Skipping candidate without identifier: '{}'", candidate.name);
            return None;
        }

        let score = similarity_with(self.policy.metric, query, &candidate.searchable_text());
        if !self.policy.passes(score) {
            return None;
        }

        let mut result = MatchResult::for_candidate(candidate, score);
        result.matched_skills = candidate.skill_list();
        result.evidence_snippets = self.evidence(query_tokens, &candidate.extracted_text);
        Some(result)
    }

    fn evidence(&self, query_tokens: &[String], text: &str) -> Vec<String> {
        let folded = FoldedText::new(text);
        query_tokens
            .iter()
            .filter_map(|token| self.policy.query_window.extract(&folded, token))
            .take(self.policy.snippet_limit())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str, skills: &str, text: &str) -> CandidateRecord {
        CandidateRecord::new(id, name, format!("{}@example.com", id), skills, "", text)
    }

    fn pool() -> Vec<CandidateRecord> {
        vec![
            candidate(
                "c-1",
                "Ana Lopez",
                "Python, Machine Learning, Tensorflow",
                "Machine learning engineer shipping TensorFlow models to production for fraud detection.",
            ),
            candidate(
                "c-2",
                "Ben Ito",
                "Java, Spring",
                "Backend engineer focused on Java Spring microservices and payments.",
            ),
            candidate(
                "c-3",
                "Cleo Park",
                "Css, Html",
                "Illustrator and art director with a passion for typography.",
            ),
        ]
    }

    #[test]
    fn test_best_candidate_first() {
        let matcher = QueryMatcher::default();
        let results = matcher.match_query("machine learning engineer python", &pool());

        assert!(!results.is_empty());
        assert_eq!(results[0].candidate_id, "c-1");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_results_exceed_threshold() {
        let matcher = QueryMatcher::default();
        for query in ["python", "java spring", "typography art", "zzz"] {
            for result in matcher.match_query(query, &pool()) {
                assert!(result.score > 0.10);
                assert!(result.score <= 1.0);
            }
        }
    }

    #[test]
    fn test_evidence_snippets() {
        let matcher = QueryMatcher::default();
        let results = matcher.match_query("tensorflow fraud production", &pool());
        let top = results.iter().find(|r| r.candidate_id == "c-1").unwrap();

        assert!(!top.evidence_snippets.is_empty());
        assert!(top.evidence_snippets.len() <= 3);
        for snippet in &top.evidence_snippets {
            assert!(snippet.starts_with("...") && snippet.ends_with("..."));
        }
        assert!(top.evidence_snippets[0].contains("TensorFlow"));
    }

    #[test]
    fn test_evidence_capped_at_three() {
        let matcher = QueryMatcher::default();
        let results = matcher.match_query(
            "machine learning engineer shipping tensorflow models production fraud",
            &pool(),
        );
        let top = results.iter().find(|r| r.candidate_id == "c-1").unwrap();
        assert_eq!(top.evidence_snippets.len(), 3);
    }

    #[test]
    fn test_oversized_snippet_policy_still_capped() {
        let policy = MatchPolicy {
            max_snippets: 6,
            ..MatchPolicy::default()
        };
        let matcher = QueryMatcher::new(policy);
        let results = matcher.match_query(
            "machine learning engineer shipping tensorflow models production fraud",
            &pool(),
        );
        let top = results.iter().find(|r| r.candidate_id == "c-1").unwrap();
        assert_eq!(top.evidence_snippets.len(), 3);
    }

    #[test]
    fn test_matched_skills_carry_candidate_skills() {
        let matcher = QueryMatcher::default();
        let results = matcher.match_query("java spring microservices", &pool());
        let ben = results.iter().find(|r| r.candidate_id == "c-2").unwrap();
        assert_eq!(ben.matched_skills, vec!["Java", "Spring"]);
        assert!(ben.missing_requirements.is_empty());
    }

    #[test]
    fn test_empty_query_and_empty_pool() {
        let matcher = QueryMatcher::default();
        assert!(matcher.match_query("", &pool()).is_empty());
        assert!(matcher.match_query("   ", &pool()).is_empty());
        assert!(matcher.match_query("python", &[]).is_empty());
    }

    #[test]
    fn test_malformed_candidate_is_skipped() {
        let matcher = QueryMatcher::default();
        let mut candidates = pool();
        candidates[0].id = String::new();
        let results = matcher.match_query("machine learning engineer python", &candidates);
        assert!(results.iter().all(|r| !r.candidate_id.is_empty()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matcher = QueryMatcher::default();
        let twin = |id: &str| candidate(id, "Twin", "Rust", "Rust systems programmer");
        let candidates = vec![twin("t-1"), twin("t-2"), twin("t-3")];
        let results = matcher.match_query("rust programmer", &candidates);

        let order: Vec<&str> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(order, vec!["t-1", "t-2", "t-3"]);
    }
}
