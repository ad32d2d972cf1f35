#![warn(missing_docs)]
//! Loadsweep Core - Sweep Model
//!
//! This crate provides the domain model for the sweep harness:
//! - `SweepGrid` iterator over the (item count, load factor) grid
//! - `Measurement` figures and the `Measure` collaborator trait
//! - Parsing of the measurement wrapper's reported metrics
//!
//! Process handling lives in `loadsweep-cli`; everything here is pure and
//! testable without spawning anything.

mod grid;
mod measure;
mod parse;

pub use grid::{LOAD_FACTORS, MAX_ITEMS, SAMPLE_UNIVERSE, SweepGrid, SweepPoint};
pub use measure::{Measure, MeasureError, Measurement};
pub use parse::{OutputError, parse_wrapper_output};
