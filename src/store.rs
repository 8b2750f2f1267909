//! Candidate and match storage used around the engine

use crate::error::{Result, TalentMatchError};
use crate::processing::records::{CandidateRecord, MatchResult};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

pub trait CandidateStore: Send + Sync {
    fn list_candidates(&self) -> Result<Vec<CandidateRecord>>;

    /// Insert a candidate, replacing any record with the same identifier
    fn insert_candidate(&self, candidate: CandidateRecord) -> Result<()>;

    fn get_candidate(&self, id: &str) -> Result<Option<CandidateRecord>>;

    /// Candidates whose name, email, skills or text contain `term`, in store order
    fn search_candidates(&self, term: &str) -> Result<Vec<CandidateRecord>> {
        let mut candidates = self.list_candidates()?;
        candidates.retain(|candidate| candidate.matches_search(term));
        Ok(candidates)
    }
}

pub trait MatchStore: Send + Sync {
    /// Insert or overwrite the result for `(job_id, result.candidate_id)`
    fn upsert_match(&self, job_id: &str, result: &MatchResult) -> Result<()>;

    /// Stored results for a job, best first
    fn matches_for_job(&self, job_id: &str) -> Result<Vec<StoredMatch>>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub job_id: String,
    pub result: MatchResult,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    candidates: Vec<CandidateRecord>,
    matches: Vec<StoredMatch>,
}

type MatchKey = (String, String);

/// Process-local store; candidates keep insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    candidates: RwLock<Vec<CandidateRecord>>,
    matches: Mutex<HashMap<MatchKey, StoredMatch>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot; a missing file gives an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No store snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&content)?;
        info!(
            "Loaded {} candidates and {} matches from {}",
            snapshot.candidates.len(),
            snapshot.matches.len(),
            path.display()
        );

        let matches = snapshot
            .matches
            .into_iter()
            .map(|m| ((m.job_id.clone(), m.result.candidate_id.clone()), m))
            .collect();

        Ok(Self {
            candidates: RwLock::new(snapshot.candidates),
            matches: Mutex::new(matches),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let candidates = self.read_candidates()?.clone();
        let mut matches: Vec<StoredMatch> = self.lock_matches()?.values().cloned().collect();
        matches.sort_by(|a, b| {
            a.job_id
                .cmp(&b.job_id)
                .then_with(|| b.result.score.total_cmp(&a.result.score))
        });

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&StoreSnapshot { candidates, matches })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn candidate_count(&self) -> Result<usize> {
        Ok(self.read_candidates()?.len())
    }

    fn read_candidates(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<CandidateRecord>>> {
        self.candidates
            .read()
            .map_err(|_| TalentMatchError::Storage("candidate lock poisoned".to_string()))
    }

    fn lock_matches(&self) -> Result<std::sync::MutexGuard<'_, HashMap<MatchKey, StoredMatch>>> {
        self.matches
            .lock()
            .map_err(|_| TalentMatchError::Storage("match lock poisoned".to_string()))
    }
}

impl CandidateStore for InMemoryStore {
    fn list_candidates(&self) -> Result<Vec<CandidateRecord>> {
        Ok(self.read_candidates()?.clone())
    }

    fn insert_candidate(&self, candidate: CandidateRecord) -> Result<()> {
        if !candidate.is_well_formed() {
            return Err(TalentMatchError::InvalidInput(
                "candidate identifier must not be empty".to_string(),
            ));
        }

        let mut candidates = self
            .candidates
            .write()
            .map_err(|_| TalentMatchError::Storage("candidate lock poisoned".to_string()))?;

        match candidates.iter_mut().find(|c| c.id == candidate.id) {
            Some(existing) => *existing = candidate,
            None => candidates.push(candidate),
        }
        Ok(())
    }

    fn get_candidate(&self, id: &str) -> Result<Option<CandidateRecord>> {
        Ok(self.read_candidates()?.iter().find(|c| c.id == id).cloned())
    }
}

impl MatchStore for InMemoryStore {
    fn upsert_match(&self, job_id: &str, result: &MatchResult) -> Result<()> {
        let stored = StoredMatch {
            job_id: job_id.to_string(),
            result: result.clone(),
            updated_at: Utc::now(),
        };
        // Insert under the lock replaces any previous result for the pair.
        self.lock_matches()?
            .insert((job_id.to_string(), result.candidate_id.clone()), stored);
        Ok(())
    }

    fn matches_for_job(&self, job_id: &str) -> Result<Vec<StoredMatch>> {
        let mut matches: Vec<StoredMatch> = self
            .lock_matches()?
            .values()
            .filter(|m| m.job_id == job_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            b.result
                .score
                .total_cmp(&a.result.score)
                .then_with(|| a.result.candidate_id.cmp(&b.result.candidate_id))
        });
        Ok(matches)
    }
}
