//! Report structures wrapping ranked match results for presentation

use crate::processing::records::{JobRequirement, MatchResult};
use crate::service::{AskResponse, JobMatchResponse};
use crate::store::StoredMatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A ranked list of candidates together with what produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub subject: ReportSubject,

    /// Candidates that passed the threshold before truncation
    pub total_results: usize,

    pub results: Vec<MatchResult>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportSubject {
    Query {
        query: String,
    },
    Job {
        job_id: String,
        title: String,
        company: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub matcher_version: String,
}

/// Coarse label for a score in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f32) -> Self {
        match score_percentage(score) {
            60..=100 => ScoreBand::Strong,
            40..=59 => ScoreBand::Good,
            25..=39 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Weak => "WEAK",
        }
    }
}

/// Score rendered as a whole percentage
pub fn score_percentage(score: f32) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

impl ReportMetadata {
    fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl MatchReport {
    pub fn from_ask(response: AskResponse) -> Self {
        Self {
            subject: ReportSubject::Query {
                query: response.query,
            },
            total_results: response.total_results,
            results: response.results,
            metadata: ReportMetadata::now(),
        }
    }

    pub fn from_job(job: &JobRequirement, response: JobMatchResponse) -> Self {
        Self {
            subject: ReportSubject::Job {
                job_id: response.job_id,
                title: response.job_title,
                company: job.company.clone(),
            },
            total_results: response.total_matches,
            results: response.matches,
            metadata: ReportMetadata::now(),
        }
    }

    /// Report over previously persisted results for one job
    pub fn from_stored(job_id: &str, stored: Vec<StoredMatch>) -> Self {
        let generated_at = stored
            .iter()
            .map(|m| m.updated_at)
            .max()
            .unwrap_or_else(Utc::now);

        Self {
            subject: ReportSubject::Job {
                job_id: job_id.to_string(),
                title: String::new(),
                company: String::new(),
            },
            total_results: stored.len(),
            results: stored.into_iter().map(|m| m.result).collect(),
            metadata: ReportMetadata {
                generated_at,
                matcher_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// Human readable heading for the report
    pub fn title(&self) -> String {
        match &self.subject {
            ReportSubject::Query { query } => format!("Candidates for \"{}\"", query),
            ReportSubject::Job { job_id, title, company } => {
                let name = if title.is_empty() { job_id.as_str() } else { title.as_str() };
                if company.is_empty() {
                    format!("Matches for {}", name)
                } else {
                    format!("Matches for {} at {}", name, company)
                }
            }
        }
    }
}
