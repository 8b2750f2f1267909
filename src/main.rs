//! talent-match: résumé ingestion and explainable candidate ranking

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use serde::Deserialize;
use std::path::Path;
use std::process;
use talent_match::cli::{self, Cli, Commands, ConfigAction};
use talent_match::config::{Config, OutputFormat};
use talent_match::error::{Result, TalentMatchError};
use talent_match::input::InputManager;
use talent_match::output::formatter::{save_report_to_file, ReportGenerator};
use talent_match::output::MatchReport;
use talent_match::processing::engine::MatchEngine;
use talent_match::processing::records::JobRequirement;
use talent_match::service::{MatchService, UploadMetadata};
use talent_match::store::{CandidateStore, InMemoryStore, MatchStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let store_path = cli
        .store
        .clone()
        .unwrap_or_else(|| config.storage.store_path.clone());

    if let Err(e) = run_command(cli.command, config, &store_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, store_path: &Path) -> Result<()> {
    match command {
        Commands::Config { action } => run_config(action, &config),
        Commands::Extract { file } => run_extract(&file, &config).await,
        command => run_store_command(command, &config, store_path).await,
    }
}

/// Commands that read or write the candidate store
async fn run_store_command(command: Commands, config: &Config, store_path: &Path) -> Result<()> {
    let engine = MatchEngine::from_config(config)?;
    let store = InMemoryStore::load(store_path)?;
    let service = MatchService::new(engine, store, config.service.clone());
    let generator = ReportGenerator::from_config(&config.output);

    match command {
        Commands::Ingest { files, name, email } => {
            if files.len() > 1 && (name.is_some() || email.is_some()) {
                return Err(TalentMatchError::InvalidInput(
                    "--name and --email can only be used with a single file".to_string(),
                ));
            }

            let progress = ProgressBar::new(files.len() as u64);
            progress.set_style(progress_style());
            progress.set_prefix("Ingesting");

            let mut ingested = Vec::new();
            for file in &files {
                progress.set_message(file.display().to_string());

                if let Err(e) = cli::validate_file_extension(file, cli::SUPPORTED_EXTENSIONS) {
                    warn!("{}: {}, decoding as plain text", file.display(), e);
                }
                let bytes = tokio::fs::read(file).await?;
                let metadata = UploadMetadata {
                    name: name.clone(),
                    email: email.clone(),
                };
                ingested.push(service.ingest(&bytes, &file.to_string_lossy(), metadata)?);
                progress.inc(1);
            }
            progress.finish_with_message(format!("ingested {} files", ingested.len()));

            service.store().save(store_path)?;
            for record in &ingested {
                println!("{}  {}  [{}]", record.id, record.name, record.skills);
            }
        }

        Commands::Candidates { query } => {
            let candidates = match query.as_deref() {
                Some(term) => service.store().search_candidates(term)?,
                None => service.store().list_candidates()?,
            };
            if candidates.is_empty() {
                match query {
                    Some(term) => println!("No candidates matching '{}'", term),
                    None => println!("No candidates stored in {}", store_path.display()),
                }
            }
            for candidate in candidates {
                println!("{}  {}  <{}>", candidate.id, candidate.name, candidate.email);
                if !candidate.skills.is_empty() {
                    println!("    Skills: {}", candidate.skills);
                }
                if !candidate.experience.is_empty() {
                    println!("    Experience: {}", candidate.experience);
                }
            }
        }

        Commands::Ask { query, k, output, save } => {
            let format = resolve_format(output.as_deref(), config)?;
            let response = service.ask(&query, k)?;
            let report = MatchReport::from_ask(response);
            emit(&generator, &report, &format, save.as_deref())?;
        }

        Commands::Match {
            job_file,
            title,
            description,
            requirements,
            company,
            id,
            top_n,
            output,
            save,
        } => {
            let format = resolve_format(output.as_deref(), config)?;
            let job = match job_file {
                Some(path) => load_job_file(&path, id, company)?,
                None => {
                    let title = title.ok_or_else(|| {
                        TalentMatchError::InvalidInput("--title or --job-file is required".to_string())
                    })?;
                    let id = id.unwrap_or_else(|| slugify(&title));
                    JobRequirement::new(
                        id,
                        title,
                        description.unwrap_or_default(),
                        requirements.unwrap_or_default(),
                    )
                    .with_company(company.unwrap_or_default())
                }
            };

            info!("Matching candidates for job '{}' ({})", job.title, job.id);
            let response = service.match_job(&job, top_n)?;
            service.store().save(store_path)?;

            let report = MatchReport::from_job(&job, response);
            emit(&generator, &report, &format, save.as_deref())?;
        }

        Commands::Matches { job_id, output } => {
            let format = resolve_format(output.as_deref(), config)?;
            let stored = service.store().matches_for_job(&job_id)?;
            if stored.is_empty() {
                return Err(TalentMatchError::NotFound(format!("no stored matches for job '{}'", job_id)));
            }
            let report = MatchReport::from_stored(&job_id, stored);
            emit(&generator, &report, &format, None)?;
        }

        Commands::Config { .. } | Commands::Extract { .. } => {}
    }

    Ok(())
}

async fn run_extract(file: &Path, config: &Config) -> Result<()> {
    let engine = MatchEngine::from_config(config)?;
    let mut input_manager = InputManager::new();
    let text = input_manager.extract_file(file).await?;

    println!("📄 {}", file.display());
    println!("Skills: {}", engine.extract_skills(&text).joined());
    println!("Experience: {}", engine.extract_experience(&text));
    println!("Text length: {} characters\n", text.chars().count());
    println!("{}", text);
    Ok(())
}

fn run_config(action: Option<ConfigAction>, config: &Config) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let content = toml::to_string_pretty(config)
                .map_err(|e| TalentMatchError::Configuration(format!("Failed to serialize config: {}", e)))?;
            println!("{}", content);
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::default().save()?;
            println!("✅ Configuration reset successfully!");
        }

        Some(ConfigAction::Path) => {
            println!("{}", Config::config_path().display());
        }
    }
    Ok(())
}

/// Job definition as written in a TOML file; the id falls back to a title slug
#[derive(Debug, Deserialize)]
struct JobFile {
    id: Option<String>,
    title: String,
    #[serde(default)]
    company: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: String,
    location: Option<String>,
}

fn load_job_file(path: &Path, id: Option<String>, company: Option<String>) -> Result<JobRequirement> {
    let content = std::fs::read_to_string(path)?;
    let file: JobFile = toml::from_str(&content)
        .map_err(|e| TalentMatchError::InvalidInput(format!("Invalid job file {}: {}", path.display(), e)))?;

    let id = id.or(file.id).unwrap_or_else(|| slugify(&file.title));
    let mut job = JobRequirement::new(id, file.title, file.description, file.requirements)
        .with_company(company.unwrap_or(file.company));
    job.location = file.location;
    Ok(job)
}

fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(TalentMatchError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit(generator: &ReportGenerator, report: &MatchReport, format: &OutputFormat, save: Option<&Path>) -> Result<()> {
    let rendered = generator.generate_report(report, format)?;
    match save {
        Some(path) => {
            save_report_to_file(&rendered, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}
