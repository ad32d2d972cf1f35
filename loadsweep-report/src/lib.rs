#![warn(missing_docs)]
//! Loadsweep Report - Tabular Output
//!
//! Accumulates one row per sweep point and renders the final report:
//! - Human text (tab-delimited table, the primary format)
//! - JSON (machine-readable)

mod json;
mod report;

pub use json::render_json;
pub use report::{Report, ReportRow, RowOutcome};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable JSON
    Json,
    /// Human-readable tab-delimited table
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
