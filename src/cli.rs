//! CLI interface for the talent matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Extensions the ingest command accepts; anything else is still decoded as text
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md"];

#[derive(Parser)]
#[command(name = "talent-match")]
#[command(about = "Résumé ingestion and candidate matching tool")]
#[command(long_about = "Extract skills and experience from résumés, then rank candidates against free-text queries or job requirements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Candidate store file (overrides the configured path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest one or more résumé files into the candidate store
    Ingest {
        /// Résumé files (PDF, DOCX or plain text)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Candidate name (only valid with a single file)
        #[arg(long)]
        name: Option<String>,

        /// Candidate e-mail (only valid with a single file)
        #[arg(long)]
        email: Option<String>,
    },

    /// Show the text and signals extracted from a file without storing it
    Extract {
        file: PathBuf,
    },

    /// List stored candidates
    Candidates {
        /// Only show candidates whose name, e-mail, skills or text contain this
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Rank candidates against a free-text query
    Ask {
        query: String,

        /// Number of results to return
        #[arg(short)]
        k: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank candidates against a job's description and requirements
    Match {
        /// Job definition file (TOML) instead of the individual flags
        #[arg(long, conflicts_with_all = ["title", "description", "requirements"])]
        job_file: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        requirements: Option<String>,

        #[arg(long)]
        company: Option<String>,

        /// Job identifier used to store the results
        #[arg(long)]
        id: Option<String>,

        /// Maximum number of candidates to return
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show stored match results for a job
    Matches {
        job_id: String,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
