//! Output formatting for the CLI.

use crate::error::Result;
use algoverse_extractor::ExtractionResult;
use algoverse_server::dispatcher::MakeOutcome;
use colored::*;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary table
    Text,
    /// JSON document
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction; `path` is `None` for dry runs, in which case the
    /// JSON form carries the artifact text.
    pub fn format_extraction(&self, result: &ExtractionResult, path: Option<&Path>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut value = serde_json::json!({
                    "filename": result.filename,
                    "path": path.map(|p| p.display().to_string()),
                    "bytes": result.artifact_text.len(),
                    "declared_name": result.declared_name,
                    "explanation": result.explanation,
                    "dependencies": result.dependencies,
                    "warnings": result.warning_messages(),
                });
                if path.is_none() {
                    value["artifact_text"] = serde_json::Value::String(result.artifact_text.clone());
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Text => {
                let written = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(dry run)".to_string());
                let rows = [
                    ("File", result.filename.clone()),
                    ("Written to", written),
                    ("Bytes", result.artifact_text.len().to_string()),
                    ("Declared name", result.declared_name.clone().unwrap_or_default()),
                    ("Dependencies", join_or_none(&result.dependencies)),
                ];
                Ok(self.with_warnings(table(&rows), &result.warning_messages()))
            }
        }
    }

    /// Format the outcome of a `make` request.
    pub fn format_outcome(&self, outcome: &MakeOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Text => {
                let rows = [
                    ("Request", outcome.request_id.clone()),
                    ("Topic", outcome.topic.clone()),
                    ("Written to", outcome.path.display().to_string()),
                    ("Bytes", outcome.bytes_written.to_string()),
                    ("Dependencies", join_or_none(&outcome.dependencies)),
                ];
                let summary = format!(
                    "{}\n{}",
                    self.success(&format!("Generated {}", outcome.filename)),
                    table(&rows)
                );
                Ok(self.with_warnings(summary, &outcome.warnings))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn with_warnings(&self, mut text: String, warnings: &[String]) -> String {
        for warning in warnings {
            text.push('\n');
            text.push_str(&self.warning(warning));
        }
        text
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn table(rows: &[(&str, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([key.to_string(), value.clone()]);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
