//! Skill and experience signals derived from normalized résumé text

use crate::error::{Result, TalentMatchError};
use crate::processing::text_processor::title_case;
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::BTreeMap;

/// Curated technology keywords recognised out of the box.
const DEFAULT_SKILL_KEYWORDS: &[&str] = &[
    "python", "java", "javascript", "react", "django", "flask", "node.js",
    "html", "css", "sql", "postgresql", "mongodb", "mysql", "git",
    "docker", "kubernetes", "aws", "azure", "gcp", "linux", "bash",
    "machine learning", "deep learning", "tensorflow", "pytorch",
    "pandas", "numpy", "scikit-learn", "opencv", "nlp", "api",
    "rest", "graphql", "microservices", "agile", "scrum", "devops",
    "ci/cd", "jenkins", "selenium", "pytest", "junit", "spring",
];

/// Experience phrasings, applied in order to lower-cased text.
const EXPERIENCE_PATTERNS: &[&str] = &[
    r"(\d+\+?)\s*years?\s*(?:of\s*)?(?:experience|exp)",
    r"experience[:]\s*(\d+\+?)\s*years?",
    r"(\d{4})\s*[-–—]\s*(\d{4}|present|current)",
];

const MAX_EXPERIENCE_MATCHES: usize = 3;
const EXPERIENCE_SEPARATOR: &str = " | ";

/// Keyword to canonical label table, traversed in sorted keyword order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillVocabulary {
    entries: BTreeMap<String, String>,
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        let entries = DEFAULT_SKILL_KEYWORDS
            .iter()
            .map(|keyword| (keyword.to_string(), title_case(keyword)))
            .collect();
        Self { entries }
    }
}

impl SkillVocabulary {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace entries; keywords are matched case-insensitively.
    pub fn with_entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (keyword, label) in entries {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() {
                self.entries.insert(keyword, label.into());
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Insertion-ordered set of skill labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillSet {
    labels: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the label was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.labels.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.labels.iter()
    }

    /// Comma-joined form stored on candidate records
    pub fn joined(&self) -> String {
        self.labels.join(", ")
    }

    pub fn into_vec(self) -> Vec<String> {
        self.labels
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = SkillSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

/// Keyword and pattern based signal extraction.
pub struct SignalExtractor {
    keywords: Vec<String>,
    labels: Vec<String>,
    keyword_matcher: AhoCorasick,
    experience_patterns: Vec<Regex>,
}

impl SignalExtractor {
    /// Create a signal extractor with the default vocabulary
    pub fn new() -> Result<Self> {
        Self::with_vocabulary(SkillVocabulary::default())
    }

    pub fn with_vocabulary(vocabulary: SkillVocabulary) -> Result<Self> {
        let (keywords, labels): (Vec<String>, Vec<String>) = vocabulary
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .unzip();

        // Keywords are stored lower-cased and the text is lower-cased before
        // scanning. Overlapping search needs the standard match kind so that
        // every contained keyword is reported, e.g. java inside javascript.
        let keyword_matcher = AhoCorasick::new(&keywords)
            .map_err(|e| TalentMatchError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        let experience_patterns = EXPERIENCE_PATTERNS
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    TalentMatchError::Processing(format!("Invalid experience pattern '{}': {}", pattern, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            keywords,
            labels,
            keyword_matcher,
            experience_patterns,
        })
    }

    /// Skill labels whose keyword occurs anywhere in the text
    pub fn extract_skills(&self, text: &str) -> SkillSet {
        let lowered = text.to_lowercase();
        let mut hits = vec![false; self.keywords.len()];
        for mat in self.keyword_matcher.find_overlapping_iter(&lowered) {
            hits[mat.pattern().as_usize()] = true;
        }

        hits.iter()
            .zip(&self.labels)
            .filter(|(hit, _)| **hit)
            .map(|(_, label)| label.clone())
            .collect()
    }

    /// Up to three experience phrases joined with `" | "`
    pub fn extract_experience(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        let phrases: Vec<&str> = self
            .experience_patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(&lowered).map(|m| m.as_str().trim()))
            .filter(|phrase| !phrase.is_empty())
            .take(MAX_EXPERIENCE_MATCHES)
            .collect();

        phrases.join(EXPERIENCE_SEPARATOR)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for SignalExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to create default signal extractor")
    }
}
