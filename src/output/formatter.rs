//! Output formatters for match reports

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::{score_percentage, MatchReport, ScoreBand};
use crate::processing::records::MatchResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting match reports
pub trait OutputFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and API consumers
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f32) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Good => Color::BrightGreen,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Weak => Color::BrightRed,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_result(&self, rank: usize, result: &MatchResult) -> String {
        let mut output = format!(
            "{}. {} {} {}% {}\n",
            rank,
            self.colorize(&result.name, Color::White),
            self.colorize(&format!("<{}>", result.email), Color::BrightBlack),
            score_percentage(result.score),
            self.format_score_badge(result.score)
        );

        if !result.matched_skills.is_empty() {
            output.push_str(&format!(
                "   Skills: {}\n",
                self.colorize(&result.matched_skills.join(", "), Color::Cyan)
            ));
        }

        if self.detailed {
            output.push_str(&format!("   Candidate: {}\n", result.candidate_id));
            for snippet in &result.evidence_snippets {
                output.push_str(&format!("   > {}\n", snippet));
            }
        } else if let Some(snippet) = result.evidence_snippets.first() {
            output.push_str(&format!("   > {}\n", snippet));
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&report.title(), 1));
        output.push_str(&format!(
            "Generated: {} | Showing {} of {} matches\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.results.len(),
            report.total_results
        ));

        if report.results.is_empty() {
            output.push_str(&format!("\n{}\n", self.colorize("No candidates matched.", Color::Yellow)));
            return Ok(output);
        }

        output.push_str(&self.format_header("Ranked Candidates", 2));
        for (i, result) in report.results.iter().enumerate() {
            output.push_str(&self.format_result(i + 1, result));
        }

        // Every job match carries the same requirement list
        if let Some(first) = report.results.first() {
            if !first.missing_requirements.is_empty() {
                output.push_str(&self.format_header("Stated Requirements", 3));
                for requirement in &first.missing_requirements {
                    output.push_str(&format!("  • {}\n", self.colorize(requirement, Color::Yellow)));
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let mut output = format!("# {}\n\n", report.title());

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Matches:** {} of {}\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.results.len(),
                report.total_results
            ));
        }

        if report.results.is_empty() {
            output.push_str("_No candidates matched._\n");
            return Ok(output);
        }

        output.push_str("| Rank | Name | Email | Score | Skills |\n");
        output.push_str("|------|------|-------|-------|--------|\n");
        for (i, result) in report.results.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {} | {}% | {} |\n",
                i + 1,
                Self::escape_cell(&result.name),
                Self::escape_cell(&result.email),
                score_percentage(result.score),
                Self::escape_cell(&result.matched_skills.join(", "))
            ));
        }
        output.push('\n');

        let with_evidence: Vec<_> = report
            .results
            .iter()
            .filter(|r| !r.evidence_snippets.is_empty())
            .collect();
        if !with_evidence.is_empty() {
            output.push_str("## Evidence\n\n");
            for result in with_evidence {
                output.push_str(&format!("### {}\n\n", result.name));
                for snippet in &result.evidence_snippets {
                    output.push_str(&format!("> {}\n\n", snippet));
                }
            }
        }

        if let Some(first) = report.results.first() {
            if !first.missing_requirements.is_empty() {
                output.push_str("## Stated Requirements\n\n");
                for requirement in &first.missing_requirements {
                    output.push_str(&format!("- {}\n", requirement));
                }
                output.push('\n');
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by talent-match v{}*\n", report.metadata.matcher_version));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true, true)
    }

    pub fn generate_report(&self, report: &MatchReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, base_name: &str, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_matches{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{ReportMetadata, ReportSubject};

    fn report() -> MatchReport {
        let mut result = MatchResult {
            candidate_id: "c-1".to_string(),
            name: "Ana | Lopez".to_string(),
            email: "ana@example.com".to_string(),
            score: 0.42,
            matched_skills: vec!["Python".to_string(), "Django".to_string()],
            missing_requirements: vec!["Python required".to_string()],
            evidence_snippets: vec!["...built Django services...".to_string()],
        };
        result.evidence_snippets.push("...Python at scale...".to_string());

        MatchReport {
            subject: ReportSubject::Query {
                query: "python".to_string(),
            },
            total_results: 3,
            results: vec![result],
            metadata: ReportMetadata {
                generated_at: "2024-05-01T12:00:00Z".parse().unwrap(),
                matcher_version: "0.1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, false).format_report(&report()).unwrap();
        assert!(output.contains("Candidates for \"python\""));
        assert!(output.contains("Showing 1 of 3 matches"));
        assert!(output.contains("1. Ana | Lopez <ana@example.com> 42% [GOOD]"));
        assert!(output.contains("> ...built Django services..."));
        assert!(!output.contains("Python at scale"));
        assert!(output.contains("Python required"));
    }

    #[test]
    fn test_console_detailed_lists_all_evidence() {
        let output = ConsoleFormatter::new(false, true).format_report(&report()).unwrap();
        assert!(output.contains("Candidate: c-1"));
        assert!(output.contains("Python at scale"));
    }

    #[test]
    fn test_markdown_escapes_cells() {
        let output = MarkdownFormatter::new(true).format_report(&report()).unwrap();
        assert!(output.contains("| 1 | Ana \\| Lopez | ana@example.com | 42% | Python, Django |"));
        assert!(output.contains("## Evidence"));
        assert!(output.contains("*Generated by talent-match v0.1.0*"));
    }

    #[test]
    fn test_json_is_parseable() {
        let output = JsonFormatter::new(false).format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["subject"]["kind"], "query");
        assert_eq!(value["results"][0]["candidate_id"], "c-1");
    }

    #[test]
    fn test_empty_report() {
        let mut empty = report();
        empty.results.clear();
        let output = ReportGenerator::with_options(false, false, true, false)
            .generate_report(&empty, &OutputFormat::Console)
            .unwrap();
        assert!(output.contains("No candidates matched."));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Markdown, "job-1", false), "job-1_matches.md");
    }
}
