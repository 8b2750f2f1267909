//! Matching engine: extraction, signals and both rankers behind one value

use crate::config::Config;
use crate::error::Result;
use crate::input::InputManager;
use crate::processing::policy::MatchPolicy;
use crate::processing::query_matcher::QueryMatcher;
use crate::processing::records::{CandidateRecord, MatchResult};
use crate::processing::requirement_matcher::RequirementMatcher;
use crate::processing::signals::{SignalExtractor, SkillSet, SkillVocabulary};
use crate::processing::similarity::similarity_with;

/// Stateless between calls: every operation works on the inputs it is given.
pub struct MatchEngine {
    signals: SignalExtractor,
    query_matcher: QueryMatcher,
    requirement_matcher: RequirementMatcher,
    policy: MatchPolicy,
}

impl MatchEngine {
    pub fn new(policy: MatchPolicy, vocabulary: SkillVocabulary) -> Result<Self> {
        Ok(Self {
            signals: SignalExtractor::with_vocabulary(vocabulary)?,
            query_matcher: QueryMatcher::new(policy.clone()),
            requirement_matcher: RequirementMatcher::new(policy.clone()),
            policy,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.match_policy(), config.skill_vocabulary())
    }

    /// Normalized text of an uploaded document, placeholder text on failure
    pub fn extract(&self, bytes: &[u8], filename: &str) -> String {
        InputManager::extract(bytes, filename)
    }

    pub fn extract_skills(&self, text: &str) -> SkillSet {
        self.signals.extract_skills(text)
    }

    pub fn extract_experience(&self, text: &str) -> String {
        self.signals.extract_experience(text)
    }

    /// Token-sorted similarity under the configured metric
    pub fn similarity(&self, text_a: &str, text_b: &str) -> f32 {
        similarity_with(self.policy.metric, text_a, text_b)
    }

    pub fn match_query(&self, query: &str, candidates: &[CandidateRecord]) -> Vec<MatchResult> {
        self.query_matcher.match_query(query, candidates)
    }

    pub fn match_requirements(
        &self,
        job_text: &str,
        candidates: &[CandidateRecord],
        top_n: usize,
    ) -> Vec<MatchResult> {
        self.requirement_matcher
            .match_requirements(job_text, candidates, top_n)
    }

    /// Build a candidate record from already extracted text
    pub fn build_candidate(
        &self,
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        text: impl Into<String>,
    ) -> CandidateRecord {
        let text = text.into();
        let skills = self.extract_skills(&text).joined();
        let experience = self.extract_experience(&text);
        CandidateRecord::new(id, name, email, skills, experience, text)
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    pub fn vocabulary_size(&self) -> usize {
        self.signals.vocabulary_size()
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(MatchPolicy::default(), SkillVocabulary::default())
            .expect("Failed to create default match engine")
    }
}
