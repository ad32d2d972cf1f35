//! Dataset Sampling
//!
//! Each sweep point is fed `items` distinct integers drawn uniformly without
//! replacement from `[1, SAMPLE_UNIVERSE]`, one per line. The default sampler
//! spawns the same OS utility the harness always used (`shuf`, structured
//! argv, no shell); the builtin sampler generates the dataset in-process for
//! hosts without it.

use loadsweep_core::MeasureError;
use rand::Rng;
use rand::seq::index;

/// Where a point's input dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sampler {
    /// Spawn an external utility and pipe its stdout into the wrapper.
    Command(String),
    /// Generate the dataset in-process.
    Builtin,
}

impl Sampler {
    /// Interpret the configured sampler name.
    pub fn from_config(name: &str) -> Self {
        if name == "builtin" {
            Sampler::Builtin
        } else {
            Sampler::Command(name.to_string())
        }
    }
}

/// Validate that `requested` distinct samples can be drawn from `universe`.
pub(crate) fn check_universe(requested: u64, universe: u64) -> Result<(), MeasureError> {
    if requested > universe {
        return Err(MeasureError::SamplingRange {
            requested,
            universe,
        });
    }
    Ok(())
}

/// Draw `count` distinct integers from `[1, universe]`, in shuffled order.
pub(crate) fn sample_distinct<R: Rng + ?Sized>(
    rng: &mut R,
    universe: u64,
    count: u64,
) -> Result<Vec<u64>, MeasureError> {
    check_universe(count, universe)?;
    let sampled = index::sample(rng, universe as usize, count as usize);
    Ok(sampled.iter().map(|i| i as u64 + 1).collect())
}
