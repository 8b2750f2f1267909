//! Error handling for the talent matcher

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalentMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, TalentMatchError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for TalentMatchError {
    fn from(err: anyhow::Error) -> Self {
        TalentMatchError::Processing(format!("{:#}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_anyhow_chain_is_kept() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("zip header")).context("reading archive");
        let converted: TalentMatchError = err.unwrap_err().into();
        assert_eq!(converted.to_string(), "Processing error: reading archive: zip header");
    }
}
