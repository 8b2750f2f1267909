//! Configuration management for the talent matcher

use crate::error::{Result, TalentMatchError};
use crate::processing::evidence::SnippetWindow;
use crate::processing::policy::{
    MatchPolicy, FULL_TEXT_WEIGHT, MAX_EVIDENCE_SNIPPETS, QUERY_SNIPPET_WINDOW,
    REQUIREMENT_SNIPPET_WINDOW, SKILLS_WEIGHT,
};
use crate::processing::signals::SkillVocabulary;
use crate::processing::similarity::SimilarityMetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub skills_weight: f32,
    pub full_text_weight: f32,
    pub metric: SimilarityMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceConfig {
    pub max_snippets: usize,
    pub query_chars_before: usize,
    pub query_chars_after: usize,
    pub query_min_chars: usize,
    pub requirement_chars_before: usize,
    pub requirement_chars_after: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Extra keyword -> label entries added to the built-in skill list
    #[serde(default)]
    pub extra_skills: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub default_k: usize,
    pub max_k: usize,
    pub default_top_n: usize,
    pub max_top_n: usize,
    pub max_query_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub store_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        let store_path = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("talent-match")
            .join("store.json");

        Self {
            scoring: ScoringConfig {
                skills_weight: SKILLS_WEIGHT,
                full_text_weight: FULL_TEXT_WEIGHT,
                metric: SimilarityMetric::Indel,
            },
            evidence: EvidenceConfig {
                max_snippets: MAX_EVIDENCE_SNIPPETS,
                query_chars_before: QUERY_SNIPPET_WINDOW.before,
                query_chars_after: QUERY_SNIPPET_WINDOW.after,
                query_min_chars: QUERY_SNIPPET_WINDOW.min_chars,
                requirement_chars_before: REQUIREMENT_SNIPPET_WINDOW.before,
                requirement_chars_after: REQUIREMENT_SNIPPET_WINDOW.after,
            },
            vocabulary: VocabularyConfig::default(),
            service: ServiceConfig {
                default_k: 5,
                max_k: 20,
                default_top_n: 10,
                max_top_n: 50,
                max_query_chars: 500,
            },
            storage: StorageConfig { store_path },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the user configuration, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TalentMatchError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TalentMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("talent-match")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        if scoring.skills_weight < 0.0 || scoring.full_text_weight < 0.0 {
            return Err(TalentMatchError::Configuration(
                "Scoring weights must be non-negative".to_string(),
            ));
        }
        if ((scoring.skills_weight + scoring.full_text_weight) - 1.0).abs() > 1e-3 {
            return Err(TalentMatchError::Configuration(format!(
                "Scoring weights must sum to 1.0, got {:.3}",
                scoring.skills_weight + scoring.full_text_weight
            )));
        }

        if self.evidence.query_chars_after == 0 || self.evidence.requirement_chars_after == 0 {
            return Err(TalentMatchError::Configuration(
                "Evidence windows need a non-zero trailing size".to_string(),
            ));
        }

        if !(1..=MAX_EVIDENCE_SNIPPETS).contains(&self.evidence.max_snippets) {
            return Err(TalentMatchError::Configuration(format!(
                "max_snippets must be within 1..={}",
                MAX_EVIDENCE_SNIPPETS
            )));
        }

        let service = &self.service;
        if service.max_k == 0 || !(1..=service.max_k).contains(&service.default_k) {
            return Err(TalentMatchError::Configuration(format!(
                "default_k must be within 1..={}",
                service.max_k
            )));
        }
        if service.max_top_n == 0 || !(1..=service.max_top_n).contains(&service.default_top_n) {
            return Err(TalentMatchError::Configuration(format!(
                "default_top_n must be within 1..={}",
                service.max_top_n
            )));
        }
        if service.max_query_chars == 0 {
            return Err(TalentMatchError::Configuration(
                "max_query_chars must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Scoring policy described by this configuration
    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy {
            metric: self.scoring.metric,
            skills_weight: self.scoring.skills_weight,
            full_text_weight: self.scoring.full_text_weight,
            max_snippets: self.evidence.max_snippets,
            query_window: SnippetWindow::new(
                self.evidence.query_chars_before,
                self.evidence.query_chars_after,
                self.evidence.query_min_chars,
            ),
            requirement_window: SnippetWindow::new(
                self.evidence.requirement_chars_before,
                self.evidence.requirement_chars_after,
                0,
            ),
        }
    }

    pub fn skill_vocabulary(&self) -> SkillVocabulary {
        SkillVocabulary::default().with_entries(self.vocabulary.extra_skills.clone())
    }
}
