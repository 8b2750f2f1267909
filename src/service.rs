//! Request boundary around the engine: validation, storage and truncation

use crate::config::ServiceConfig;
use crate::error::{Result, TalentMatchError};
use crate::processing::engine::MatchEngine;
use crate::processing::records::{CandidateRecord, JobRequirement, MatchResult};
use crate::processing::text_processor::TextProcessor;
use crate::store::{CandidateStore, MatchStore};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub query: String,
    /// Survivors before truncation to `k`
    pub total_results: usize,
    pub results: Vec<MatchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatchResponse {
    pub job_id: String,
    pub job_title: String,
    pub total_matches: usize,
    pub matches: Vec<MatchResult>,
}

/// Optional metadata supplied with an upload
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct MatchService<S> {
    engine: MatchEngine,
    store: S,
    settings: ServiceConfig,
    text_processor: TextProcessor,
}

impl<S> MatchService<S>
where
    S: CandidateStore + MatchStore,
{
    pub fn new(engine: MatchEngine, store: S, settings: ServiceConfig) -> Self {
        Self {
            engine,
            store,
            settings,
            text_processor: TextProcessor::new(),
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &ServiceConfig {
        &self.settings
    }

    /// Turn an uploaded document into a stored candidate record.
    ///
    /// The name falls back to the file stem and the e-mail to the first
    /// address found in the extracted text.
    pub fn ingest(&self, bytes: &[u8], filename: &str, metadata: UploadMetadata) -> Result<CandidateRecord> {
        let text = self.engine.extract(bytes, filename);

        let name = metadata
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| {
                Path::new(filename)
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_else(|| filename.to_string())
            });
        let email = metadata
            .email
            .filter(|email| !email.trim().is_empty())
            .or_else(|| self.text_processor.find_email(&text))
            .unwrap_or_default();

        let record = self
            .engine
            .build_candidate(Uuid::new_v4().to_string(), name, email, text);
        info!(
            "Ingested {} as {} ({} skills)",
            filename,
            record.id,
            record.skill_list().len()
        );

        self.store.insert_candidate(record.clone())?;
        Ok(record)
    }

    /// Rank stored candidates against a free-text query and keep the top `k`.
    pub fn ask(&self, query: &str, k: Option<usize>) -> Result<AskResponse> {
        if query.trim().is_empty() {
            return Err(TalentMatchError::InvalidInput("query must not be empty".to_string()));
        }
        if query.chars().count() > self.settings.max_query_chars {
            return Err(TalentMatchError::InvalidInput(format!(
                "query must be at most {} characters",
                self.settings.max_query_chars
            )));
        }
        let k = bounded("k", k.unwrap_or(self.settings.default_k), self.settings.max_k)?;

        let candidates = self.store.list_candidates()?;
        let mut results = self.engine.match_query(query, &candidates);
        let total_results = results.len();
        results.truncate(k);

        info!("Query '{}' returned {} of {} matches", query, results.len(), total_results);
        Ok(AskResponse {
            query: query.to_string(),
            total_results,
            results,
        })
    }

    /// Rank stored candidates for a job and persist every returned match.
    pub fn match_job(&self, job: &JobRequirement, top_n: Option<usize>) -> Result<JobMatchResponse> {
        let top_n = bounded(
            "top_n",
            top_n.unwrap_or(self.settings.default_top_n),
            self.settings.max_top_n,
        )?;

        let job_text = job.match_text();
        if job_text.trim().is_empty() {
            return Err(TalentMatchError::InvalidInput(format!(
                "job '{}' has no description or requirements",
                job.id
            )));
        }

        let candidates = self.store.list_candidates()?;
        let matches = self.engine.match_requirements(&job_text, &candidates, top_n);

        for result in &matches {
            self.store.upsert_match(&job.id, result)?;
        }

        info!("Job '{}' matched {} candidates", job.title, matches.len());
        Ok(JobMatchResponse {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            total_matches: matches.len(),
            matches,
        })
    }
}

fn bounded(name: &str, value: usize, max: usize) -> Result<usize> {
    if (1..=max).contains(&value) {
        Ok(value)
    } else {
        Err(TalentMatchError::InvalidInput(format!(
            "{} must be between 1 and {}, got {}",
            name, max, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::InMemoryStore;

    fn service() -> MatchService<InMemoryStore> {
        MatchService::new(
            MatchEngine::default(),
            InMemoryStore::new(),
            Config::default().service,
        )
    }

    #[test]
    fn test_ingest_fills_defaults() {
        let service = service();
        let text = "Jane Roe\njane.roe@example.com\nPython and Django developer, 4 years of experience";
        let record = service
            .ingest(text.as_bytes(), "uploads/jane_roe.txt", UploadMetadata::default())
            .unwrap();

        assert_eq!(record.name, "jane_roe");
        assert_eq!(record.email, "jane.roe@example.com");
        assert_eq!(record.skills, "Django, Python");
        assert_eq!(record.experience, "4 years of experience");
        assert!(Uuid::parse_str(&record.id).is_ok());
        assert_eq!(service.store().candidate_count().unwrap(), 1);
    }

    #[test]
    fn test_ingest_prefers_supplied_metadata() {
        let service = service();
        let metadata = UploadMetadata {
            name: Some("J. Roe".to_string()),
            email: Some("j@roe.dev".to_string()),
        };
        let record = service
            .ingest(b"contact: other@example.com", "cv.txt", metadata)
            .unwrap();
        assert_eq!(record.name, "J. Roe");
        assert_eq!(record.email, "j@roe.dev");
    }

    #[test]
    fn test_ask_validates_input() {
        let service = service();
        assert!(matches!(service.ask("  ", None), Err(TalentMatchError::InvalidInput(_))));
        assert!(service.ask("python", Some(0)).is_err());
        assert!(service.ask("python", Some(21)).is_err());
        assert!(service.ask(&"x".repeat(501), None).is_err());
    }

    #[test]
    fn test_ask_truncates_to_k() {
        let service = service();
        for i in 0..4 {
            let text = format!("Candidate {} Python developer", i);
            service
                .ingest(text.as_bytes(), &format!("c{}.txt", i), UploadMetadata::default())
                .unwrap();
        }

        let response = service.ask("python developer", Some(2)).unwrap();
        assert_eq!(response.total_results, 4);
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_match_job_persists_results() {
        let service = service();
        service
            .ingest(b"Python, Django and React engineer", "ana.txt", UploadMetadata::default())
            .unwrap();

        let job = JobRequirement::new(
            "job-1",
            "Backend Engineer",
            "Build Django services.",
            "Python required. React is a plus.",
        );
        let first = service.match_job(&job, None).unwrap();
        assert_eq!(first.total_matches, 1);
        assert_eq!(first.matches[0].missing_requirements, vec!["Python required"]);

        service.match_job(&job, Some(5)).unwrap();
        let stored = service.store().matches_for_job("job-1").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].result, first.matches[0]);
    }

    #[test]
    fn test_match_job_validates_input() {
        let service = service();
        let job = JobRequirement::new("job-1", "Empty", " ", " ");
        assert!(service.match_job(&job, None).is_err());

        let job = JobRequirement::new("job-2", "Engineer", "Python", "Django");
        assert!(service.match_job(&job, Some(51)).is_err());
        assert!(service.match_job(&job, Some(0)).is_err());
    }
}
