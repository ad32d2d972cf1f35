//! Sweep Execution
//!
//! Drives the grid through a `Measure` implementation and assembles report
//! rows in sweep order. Sequential by default; with `jobs > 1` invocations
//! fan out over a bounded worker pool, index-tagged and sorted back so the
//! report order never changes.

use indicatif::{ProgressBar, ProgressStyle};
use loadsweep_core::{Measure, MeasureError, Measurement, SweepGrid, SweepPoint};
use loadsweep_report::{Report, RowOutcome};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

/// How the executor reacts to a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record a placeholder row and keep sweeping (default). Failures are
    /// surfaced in the report's failure summary.
    #[default]
    Continue,
    /// Abort the sweep on the first failure, naming the failing point.
    FailFast,
}

/// A sweep stopped by the fail-fast policy.
#[derive(Debug, Error)]
#[error("sweep aborted at {items} items, load factor {load_factor}: {source}")]
pub struct SweepAborted {
    /// Item count of the failing point.
    pub items: u64,
    /// Load factor of the failing point.
    pub load_factor: f64,
    /// The invocation failure.
    #[source]
    pub source: MeasureError,
}

/// Runs a sweep grid against a `Measure` implementation.
pub struct SweepExecutor {
    policy: FailurePolicy,
    jobs: usize,
}

impl SweepExecutor {
    /// Create an executor with the given failure policy and worker count.
    pub fn new(policy: FailurePolicy, jobs: usize) -> Self {
        Self {
            policy,
            jobs: jobs.max(1),
        }
    }

    /// Measure every point of `grid`, in order, and build the report.
    ///
    /// Under `FailurePolicy::Continue` the result is always `Ok`; failed
    /// points become placeholder rows. Under `FailurePolicy::FailFast` the
    /// first failure (in sweep order) aborts the sweep.
    pub fn execute<M: Measure + Sync>(
        &self,
        grid: SweepGrid,
        runner: &M,
    ) -> Result<Report, SweepAborted> {
        let points: Vec<SweepPoint> = grid.collect();
        let pb = progress_bar(points.len() as u64);

        let outcomes: Vec<(SweepPoint, Result<Measurement, MeasureError>)> = if self.jobs == 1 {
            self.run_sequential(points, runner, &pb)
        } else {
            self.run_pooled(points, runner, &pb)
        };
        pb.finish_and_clear();

        let mut report = Report::new();
        for (point, result) in outcomes {
            match result {
                Ok(measurement) => report.push(point, RowOutcome::Measured(measurement)),
                Err(e) => match self.policy {
                    FailurePolicy::FailFast => {
                        return Err(SweepAborted {
                            items: point.items,
                            load_factor: point.load_factor,
                            source: e,
                        });
                    }
                    FailurePolicy::Continue => {
                        warn!(
                            items = point.items,
                            load_factor = point.load_factor,
                            error = %e,
                            "invocation failed; recording placeholder row"
                        );
                        report.push(point, RowOutcome::Failed(e.to_string()));
                    }
                },
            }
        }
        Ok(report)
    }

    fn run_sequential<M: Measure>(
        &self,
        points: Vec<SweepPoint>,
        runner: &M,
        pb: &ProgressBar,
    ) -> Vec<(SweepPoint, Result<Measurement, MeasureError>)> {
        let mut outcomes = Vec::with_capacity(points.len());
        for point in points {
            pb.set_message(format!("{} items @ {}", point.items, point.load_factor));
            let result = runner.measure(&point);
            pb.inc(1);

            // Under fail-fast there is no reason to keep spawning pipelines
            // once a failure is queued for the caller.
            let failed = result.is_err();
            outcomes.push((point, result));
            if failed && self.policy == FailurePolicy::FailFast {
                break;
            }
        }
        outcomes
    }

    fn run_pooled<M: Measure + Sync>(
        &self,
        points: Vec<SweepPoint>,
        runner: &M,
        pb: &ProgressBar,
    ) -> Vec<(SweepPoint, Result<Measurement, MeasureError>)> {
        let worker_count = self.jobs.min(points.len().max(1));

        let work = |points: Vec<SweepPoint>| {
            let mut indexed: Vec<(usize, SweepPoint, Result<Measurement, MeasureError>)> = points
                .into_par_iter()
                .enumerate()
                .map(|(index, point)| {
                    let result = runner.measure(&point);
                    pb.inc(1);
                    (index, point, result)
                })
                .collect();
            // Reassemble into sweep order; rows are never emitted in
            // completion order.
            indexed.sort_by_key(|(index, _, _)| *index);
            indexed
                .into_iter()
                .map(|(_, point, result)| (point, result))
                .collect()
        };

        match ThreadPoolBuilder::new().num_threads(worker_count).build() {
            Ok(pool) => pool.install(|| work(points)),
            Err(e) => {
                warn!(error = %e, "failed to build worker pool; using global pool");
                work(points)
            }
        }
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadsweep_core::LOAD_FACTORS;

    /// Fake pipeline: reports a measurement derived from the point itself.
    struct EchoRunner;

    impl Measure for EchoRunner {
        fn measure(&self, point: &SweepPoint) -> Result<Measurement, MeasureError> {
            Ok(Measurement {
                elapsed: format!("t{}@{}", point.items, point.load_factor),
                peak_memory: "64".to_string(),
            })
        }
    }

    /// Fake pipeline that fails for one specific point.
    struct FailAt {
        items: u64,
        load_factor: f64,
    }

    impl Measure for FailAt {
        fn measure(&self, point: &SweepPoint) -> Result<Measurement, MeasureError> {
            if point.items == self.items && point.load_factor == self.load_factor {
                return Err(MeasureError::SamplingRange {
                    requested: point.items,
                    universe: 0,
                });
            }
            EchoRunner.measure(point)
        }
    }

    #[test]
    fn restricted_sweep_renders_18_lines() {
        let executor = SweepExecutor::new(FailurePolicy::Continue, 1);
        let report = executor.execute(SweepGrid::up_to(10), &EchoRunner).unwrap();

        assert_eq!(report.rows().len(), 16);
        assert_eq!(report.render().lines().count(), 18);
    }

    #[test]
    fn rows_follow_sweep_order() {
        let executor = SweepExecutor::new(FailurePolicy::Continue, 1);
        let report = executor.execute(SweepGrid::up_to(10), &EchoRunner).unwrap();

        let expected: Vec<SweepPoint> = SweepGrid::up_to(10).collect();
        for (row, point) in report.rows().iter().zip(&expected) {
            assert_eq!(row.items, point.items);
            assert_eq!(row.load_factor, point.load_factor);
        }
    }

    #[test]
    fn pooled_execution_keeps_sweep_order() {
        let executor = SweepExecutor::new(FailurePolicy::Continue, 4);
        let report = executor.execute(SweepGrid::full(), &EchoRunner).unwrap();

        let expected: Vec<SweepPoint> = SweepGrid::full().collect();
        assert_eq!(report.rows().len(), expected.len());
        for (row, point) in report.rows().iter().zip(&expected) {
            assert_eq!(row.items, point.items);
            assert_eq!(row.load_factor, point.load_factor);
            match &row.outcome {
                RowOutcome::Measured(m) => {
                    assert_eq!(m.elapsed, format!("t{}@{}", point.items, point.load_factor));
                }
                RowOutcome::Failed(reason) => panic!("unexpected failure: {}", reason),
            }
        }
    }

    #[test]
    fn continue_policy_records_placeholder_rows() {
        let runner = FailAt {
            items: 10,
            load_factor: 2.0,
        };
        let executor = SweepExecutor::new(FailurePolicy::Continue, 1);
        let report = executor.execute(SweepGrid::up_to(10), &runner).unwrap();

        assert_eq!(report.rows().len(), 16);
        assert_eq!(report.failures().count(), 1);

        let (failed_row, _) = report.failures().next().unwrap();
        assert_eq!(failed_row.items, 10);
        assert_eq!(failed_row.load_factor, 2.0);
        assert!(report.render().contains("10\t2.0\t-\t-"));
    }

    #[test]
    fn fail_fast_aborts_and_names_the_point() {
        let runner = FailAt {
            items: 1,
            load_factor: LOAD_FACTORS[3],
        };
        let executor = SweepExecutor::new(FailurePolicy::FailFast, 1);
        let err = executor.execute(SweepGrid::up_to(10), &runner).unwrap_err();

        assert_eq!(err.items, 1);
        assert_eq!(err.load_factor, LOAD_FACTORS[3]);
        assert!(matches!(err.source, MeasureError::SamplingRange { .. }));
    }

    #[test]
    fn fail_fast_in_a_pool_reports_the_earliest_failure() {
        let runner = FailAt {
            items: 10,
            load_factor: 0.75,
        };
        let executor = SweepExecutor::new(FailurePolicy::FailFast, 4);
        let err = executor.execute(SweepGrid::up_to(10), &runner).unwrap_err();

        assert_eq!(err.items, 10);
        assert_eq!(err.load_factor, 0.75);
    }
}
