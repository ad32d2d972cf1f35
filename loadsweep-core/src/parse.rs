//! Wrapper Output Parsing
//!
//! The measurement wrapper reports one line with two tab-separated fields:
//! elapsed time and peak memory. Each field may carry a unit label separated
//! from the magnitude by whitespace; only the magnitude is kept. A unit
//! suffix attached directly to the magnitude stays part of the value.

use crate::measure::Measurement;
use thiserror::Error;

/// Failure to extract a measurement from captured wrapper output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OutputError {
    /// The captured text holds no tab separator between the two fields.
    #[error("wrapper output has no tab separator: {0:?}")]
    MissingTab(String),

    /// A field was present but held no value.
    #[error("wrapper output {field} field is empty")]
    EmptyField {
        /// Which field was empty.
        field: &'static str,
    },
}

/// Split one captured blob into elapsed-time and peak-memory values.
pub fn parse_wrapper_output(raw: &str) -> Result<Measurement, OutputError> {
    let (elapsed_field, memory_field) = raw
        .split_once('\t')
        .ok_or_else(|| OutputError::MissingTab(raw.trim_end().to_string()))?;

    let elapsed = leading_value(elapsed_field).ok_or(OutputError::EmptyField { field: "elapsed" })?;
    let peak_memory =
        leading_value(memory_field).ok_or(OutputError::EmptyField { field: "peak memory" })?;

    Ok(Measurement {
        elapsed: elapsed.to_string(),
        peak_memory: peak_memory.to_string(),
    })
}

/// The substring up to (not including) the first whitespace character.
fn leading_value(field: &str) -> Option<&str> {
    let value = field.split(char::is_whitespace).next().unwrap_or("");
    if value.is_empty() { None } else { Some(value) }
}
