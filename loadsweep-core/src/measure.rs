//! Measurement Model
//!
//! One invocation of the external pipeline measures one sweep point. The
//! `Measure` trait is the seam between the sweep loop and the processes it
//! drives, so the loop and report logic run against fakes in tests.

use crate::grid::SweepPoint;
use crate::parse::OutputError;
use serde::{Deserialize, Serialize};
use std::process::ExitStatus;
use thiserror::Error;

/// Timing and memory figures reported by the wrapper for one sweep point.
///
/// Values are kept exactly as the wrapper printed them, attached unit
/// suffixes included; the harness never converts them to a canonical scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Elapsed-time magnitude.
    pub elapsed: String,
    /// Peak-memory magnitude.
    pub peak_memory: String,
}

/// Failure of a single measurement invocation.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// The point asks for more distinct samples than the universe holds.
    #[error("cannot draw {requested} distinct samples from a universe of {universe}")]
    SamplingRange {
        /// Items requested by the sweep point.
        requested: u64,
        /// Size of the sampling universe.
        universe: u64,
    },

    /// The sampler or wrapper process could not be started or awaited.
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// The command that failed.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A pipeline process ran but exited with a nonzero status.
    #[error("{command} exited with {status}")]
    Pipeline {
        /// The command that failed.
        command: String,
        /// Its exit status.
        status: ExitStatus,
        /// Diagnostic output captured from the process, if any.
        stderr: String,
    },

    /// The wrapper's captured output could not be parsed.
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// One measurement of one sweep point.
///
/// Implementations own their process handles exclusively; invocations share
/// no state, so one value can serve a whole worker pool.
pub trait Measure {
    /// Run the pipeline for `point` and return the parsed figures.
    fn measure(&self, point: &SweepPoint) -> Result<Measurement, MeasureError>;
}
