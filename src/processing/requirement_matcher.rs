//! Job requirement ranking: composite skills/full-text score with
//! matched skills, requirement sentences and evidence.

use crate::processing::evidence::FoldedText;
use crate::processing::policy::{rank_descending, MatchPolicy, REQUIREMENT_MARKERS};
use crate::processing::records::{CandidateRecord, MatchResult};
use crate::processing::similarity::similarity_with;
use crate::processing::text_processor::{split_sentences, title_case, TextProcessor};
use log::{debug, warn};
use rayon::prelude::*;

/// Ranks candidates against the combined description and requirements of a job
pub struct RequirementMatcher {
    policy: MatchPolicy,
    text_processor: TextProcessor,
}

/// Per-job data shared by every candidate evaluation
struct JobContext<'a> {
    text: &'a str,
    tokens: Vec<String>,
    missing_requirements: Vec<String>,
}

impl Default for RequirementMatcher {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

impl RequirementMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            text_processor: TextProcessor::new(),
        }
    }

    /// Rank candidates best first and keep at most `top_n`.
    pub fn match_requirements(
        &self,
        job_text: &str,
        candidates: &[CandidateRecord],
        top_n: usize,
    ) -> Vec<MatchResult> {
        if job_text.trim().is_empty() {
            debug!("Empty job text, nothing to match");
            return Vec::new();
        }

        let job = JobContext {
            text: job_text,
            tokens: self.text_processor.word_tokens(job_text),
            missing_requirements: requirement_sentences(job_text),
        };

        let mut results: Vec<MatchResult> = candidates
            .par_iter()
            .filter_map(|candidate| self.score_candidate(&job, candidate))
            .collect();

        rank_descending(&mut results);
        let survivors = results.len();
        results.truncate(top_n);
        debug!(
            "Job matched {} of {} candidates, returning {}",
            survivors,
            candidates.len(),
            results.len()
        );
        results
    }

    fn score_candidate(&self, job: &JobContext<'_>, candidate: &CandidateRecord) -> Option<MatchResult> {
        if !candidate.is_well_formed() {
            warn!("Skipping candidate without identifier: '{}'", candidate.name);
            return None;
        }

        let combined = candidate.skills_and_text();
        let skills_score = similarity_with(self.policy.metric, job.text, &candidate.skills);
        let full_score = similarity_with(self.policy.metric, job.text, &combined);
        let score = self.policy.composite(skills_score, full_score);

        debug!(
            "Candidate {}: skills {:.3}, full text {:.3}, composite {:.3}",
            candidate.id, skills_score, full_score, score
        );

        if !self.policy.passes(score) {
            return None;
        }

        let matched_skills = matched_skills(&job.tokens, &candidate.skills);
        let evidence_snippets = self.evidence(&matched_skills, &combined);

        let mut result = MatchResult::for_candidate(candidate, score);
        result.matched_skills = matched_skills;
        result.missing_requirements = job.missing_requirements.clone();
        result.evidence_snippets = evidence_snippets;
        Some(result)
    }

    fn evidence(&self, matched_skills: &[String], combined: &str) -> Vec<String> {
        let folded = FoldedText::new(combined);
        matched_skills
            .iter()
            .take(self.policy.snippet_limit())
            .filter_map(|skill| {
                self.policy
                    .requirement_window
                    .extract(&folded, &skill.to_lowercase())
            })
            .collect()
    }
}

/// Candidate skills containing any job token, title-cased, in candidate order.
pub fn matched_skills(job_tokens: &[String], skills: &str) -> Vec<String> {
    skills
        .to_lowercase()
        .split(',')
        .map(|skill| skill.trim())
        .filter(|skill| !skill.is_empty())
        .filter(|skill| job_tokens.iter().any(|token| skill.contains(token.as_str())))
        .map(title_case)
        .collect()
}

/// First sentence mentioning each requirement marker, one entry per marker
/// found, so a sentence carrying two markers is listed twice.
///
/// Keyword presence is not a gap analysis: a reported sentence may well be
/// satisfied by the candidate already.
pub fn requirement_sentences(job_text: &str) -> Vec<String> {
    let lowered = job_text.to_lowercase();
    let sentences = split_sentences(job_text);
    let mut found: Vec<String> = Vec::new();

    for marker in REQUIREMENT_MARKERS {
        if !lowered.contains(marker) {
            continue;
        }
        let sentence = sentences
            .iter()
            .find(|sentence| sentence.to_lowercase().contains(marker))
            .map(|sentence| sentence.trim().to_string());

        if let Some(sentence) = sentence {
            found.push(sentence);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "We require Python and Django experience, React is a plus.";

    fn candidate(id: &str, skills: &str, text: &str) -> CandidateRecord {
        CandidateRecord::new(id, format!("Candidate {}", id), "", skills, "", text)
    }

    #[test]
    fn test_composite_scenario() {
        let matcher = RequirementMatcher::default();
        let record = candidate(
            "c-1",
            "Python, Django, React",
            "Full stack developer. Built Django REST APIs in Python and React frontends.",
        );

        let skills_score = similarity_with(Default::default(), JOB, &record.skills);
        let full_score = similarity_with(Default::default(), JOB, &record.skills_and_text());
        assert!(skills_score > 0.10);
        assert!(full_score > 0.10);

        let results = matcher.match_requirements(JOB, std::slice::from_ref(&record), 10);
        assert_eq!(results.len(), 1);

        let expected = 0.7 * skills_score + 0.3 * full_score;
        assert!((results[0].score - expected).abs() < 1e-6);
        assert!(results[0].matched_skills.contains(&"Python".to_string()));
        assert!(results[0].matched_skills.contains(&"Django".to_string()));
    }

    #[test]
    fn test_matched_skills_keep_candidate_order() {
        let tokens = TextProcessor::new().word_tokens("Looking for django and python people");
        let matched = matched_skills(&tokens, "Python, Go, Django, node.js");
        assert_eq!(matched, vec!["Python", "Django"]);
    }

    #[test]
    fn test_matched_skills_use_substring_containment() {
        let tokens = TextProcessor::new().word_tokens("Strong learning mindset");
        let matched = matched_skills(&tokens, "Machine Learning, Rust");
        assert_eq!(matched, vec!["Machine Learning"]);
    }

    #[test]
    fn test_single_requirement_sentence() {
        let sentences = requirement_sentences("Required: 5 years Python. Nice to have: Go");
        assert_eq!(sentences, vec!["Required: 5 years Python"]);
    }

    #[test]
    fn test_requirement_markers_in_priority_order() {
        let text = "Docker is essential. You must have AWS. Python required.";
        let sentences = requirement_sentences(text);
        assert_eq!(sentences, vec!["Python required", "You must have AWS", "Docker is essential"]);
    }

    #[test]
    fn test_sentence_listed_once_per_marker() {
        let sentences = requirement_sentences("Python is required and essential. Other.");
        assert_eq!(
            sentences,
            vec!["Python is required and essential", "Python is required and essential"]
        );

        let single = requirement_sentences("Kubernetes is essential. Other stuff.");
        assert_eq!(single, vec!["Kubernetes is essential"]);
    }

    #[test]
    fn test_no_requirement_markers() {
        assert!(requirement_sentences("Friendly team, remote work.").is_empty());
    }

    #[test]
    fn test_evidence_from_matched_skills() {
        let matcher = RequirementMatcher::default();
        let record = candidate(
            "c-1",
            "Python, Django",
            "Maintained Django applications for five years.",
        );
        let results = matcher.match_requirements(JOB, &[record], 10);

        assert_eq!(results.len(), 1);
        let snippets = &results[0].evidence_snippets;
        assert_eq!(snippets.len(), 2);
        assert!(snippets.iter().all(|s| s.starts_with("...") && s.ends_with("...")));
        assert!(snippets[0].contains("Python"));
    }

    #[test]
    fn test_top_n_truncation() {
        let matcher = RequirementMatcher::default();
        let candidates: Vec<CandidateRecord> = (0..6)
            .map(|i| candidate(&format!("c-{}", i), "Python, Django, React", "Python Django React developer"))
            .collect();

        let results = matcher.match_requirements(JOB, &candidates, 4);
        assert_eq!(results.len(), 4);
        let ids: Vec<&str> = results.iter().map(|r| r.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["c-0", "c-1", "c-2", "c-3"]);

        assert!(matcher.match_requirements(JOB, &candidates, 0).is_empty());
    }

    #[test]
    fn test_unrelated_candidates_are_dropped() {
        let matcher = RequirementMatcher::default();
        let record = candidate("c-1", "", "zzz");
        let results = matcher.match_requirements(JOB, &[record], 10);
        assert!(results.is_empty());
    }

    #[test]
    fn test_missing_requirements_attached() {
        let matcher = RequirementMatcher::default();
        let job = "Python developer. Required: 5 years Python. Django is a plus";
        let record = candidate("c-1", "Python, Django", "Python developer, Django projects");
        let results = matcher.match_requirements(job, &[record], 10);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].missing_requirements, vec!["Required: 5 years Python"]);
    }

    #[test]
    fn test_empty_job_text() {
        let matcher = RequirementMatcher::default();
        let record = candidate("c-1", "Python", "Python");
        assert!(matcher.match_requirements("  ", &[record], 10).is_empty());
    }
}
