//! Candidate, job and match records exchanged with the engine

use serde::{Deserialize, Serialize};

/// Normalized representation of an uploaded résumé.
///
/// Produced once by ingestion and treated as read-only by the matchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Ordered, deduplicated skill labels joined with `", "`.
    pub skills: String,
    pub experience: String,
    pub extracted_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// One ranked candidate, with the evidence that justifies its position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub name: String,
    pub email: String,
    pub score: f32,
    pub matched_skills: Vec<String>,
    pub missing_requirements: Vec<String>,
    pub evidence_snippets: Vec<String>,
}

impl CandidateRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        skills: impl Into<String>,
        experience: impl Into<String>,
        extracted_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            skills: skills.into(),
            experience: experience.into(),
            extracted_text: extracted_text.into(),
        }
    }

    /// Skill labels split back out of the comma-joined list
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }

    /// Name, skills and text joined for free-text querying
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.name, self.skills, self.extracted_text)
    }

    /// Skills followed by the full text, the blob job matching scores against
    pub fn skills_and_text(&self) -> String {
        format!("{} {}", self.skills, self.extracted_text)
    }

    /// Case-insensitive containment over name, email, skills and text.
    /// A blank search term matches every record.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.name, &self.email, &self.skills, &self.extracted_text]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// A record without an identifier cannot be ranked or persisted.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

impl JobRequirement {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        requirements: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: String::new(),
            description: description.into(),
            requirements: requirements.into(),
            location: None,
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Description and requirements combined into the match target
    pub fn match_text(&self) -> String {
        format!("{} {}", self.description, self.requirements)
    }
}

impl MatchResult {
    pub fn for_candidate(candidate: &CandidateRecord, score: f32) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            score,
            matched_skills: Vec::new(),
            missing_requirements: Vec::new(),
            evidence_snippets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CandidateRecord {
        CandidateRecord::new(
            "c-1",
            "Jane Roe",
            "jane@example.com",
            "Python, Django, React",
            "5 years of experience",
            "Backend developer building Django services.",
        )
    }

    #[test]
    fn test_skill_list_splits_and_trims() {
        assert_eq!(sample().skill_list(), vec!["Python", "Django", "React"]);

        let empty = CandidateRecord::new("c-2", "", "", "", "", "text");
        assert!(empty.skill_list().is_empty());
    }

    #[test]
    fn test_searchable_text_joins_fields() {
        let text = sample().searchable_text();
        assert!(text.starts_with("Jane Roe Python, Django, React Backend"));
    }

    #[test]
    fn test_malformed_candidate() {
        let mut record = sample();
        assert!(record.is_well_formed());
        record.id = "  ".to_string();
        assert!(!record.is_well_formed());
    }

    #[test]
    fn test_job_match_text() {
        let job = JobRequirement::new("j-1", "Engineer", "Build APIs.", "Python required.");
        assert_eq!(job.match_text(), "Build APIs. Python required.");
    }
}
