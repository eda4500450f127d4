mod cli;
mod json;

pub use cli::{print_cli_table, render_cli_table};
pub use json::{print_json, render_json};

use crate::model::ScanSummary;
use anyhow::Result;

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

pub fn print_result(summary: &ScanSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(summary),
        OutputFormat::Json => print_json(summary),
    }
}

/// Format result to string for file output
pub fn format_result_to_string(summary: &ScanSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_cli_table(summary)),
        OutputFormat::Json => render_json(summary),
    }
}
