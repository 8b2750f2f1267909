//! Input manager: routes payloads to extractors and applies the fallback policy

use crate::error::{Result, TalentMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{DocxExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extract normalized text from a document payload.
    ///
    /// Never fails: parse errors degrade to a placeholder naming the file and
    /// the error, and the result is always trimmed and non-empty.
    pub fn extract(bytes: &[u8], filename: &str) -> String {
        let display_name = Path::new(filename)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string());

        let text = match FileType::from_filename(filename) {
            FileType::Pdf => PdfExtractor.extract(bytes).unwrap_or_else(|e| {
                warn!("PDF extraction failed for {}: {}", display_name, e);
                format!("PDF file uploaded: {}\nText extraction failed: {}", display_name, e)
            }),
            FileType::Docx => DocxExtractor::new().extract(bytes).unwrap_or_else(|e| {
                warn!("DOCX extraction failed for {}: {}", display_name, e);
                format!("DOCX file uploaded: {}\nText extraction failed: {}", display_name, e)
            }),
            FileType::Other => PlainTextExtractor.extract(bytes).unwrap_or_else(|e| {
                warn!("Text decoding failed for {}: {}", display_name, e);
                format!(
                    "File uploaded: {}\nUnsupported format or extraction failed: {}",
                    display_name, e
                )
            }),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            warn!("No text extracted from {}", display_name);
            return format!("File uploaded: {}\nNo text could be extracted.", display_name);
        }

        trimmed.to_string()
    }

    /// Read a file and extract its text on a blocking worker.
    pub async fn extract_file(&mut self, path: &Path) -> Result<String> {
        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(path) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(TalentMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        info!("Extracting text from: {}", path.display());
        let bytes = tokio::fs::read(path).await?;
        let filename = path.to_string_lossy().to_string();

        let text = tokio::task::spawn_blocking(move || Self::extract(&bytes, &filename))
            .await
            .map_err(|e| TalentMatchError::Processing(format!("Extraction task failed: {}", e)))?;

        if self.enable_cache {
            self.cache.insert(path.to_path_buf(), text.clone());
        }

        Ok(text)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
