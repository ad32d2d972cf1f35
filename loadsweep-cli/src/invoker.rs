//! Pipeline Invocation
//!
//! Runs one sweep point through the external measurement pipeline: a dataset
//! of distinct integers is piped into `<wrapper> <program> <load-flag>
//! <load-factor>`, the program's own stdout is discarded, and the wrapper's
//! diagnostic output is captured and parsed.
//!
//! Commands are built as structured argument lists; nothing goes through a
//! shell. Exit statuses of every spawned process are checked.

use crate::sampler::{Sampler, check_universe, sample_distinct};
use loadsweep_core::{
    Measure, MeasureError, Measurement, SAMPLE_UNIVERSE, SweepPoint, parse_wrapper_output,
};
use std::io::{BufWriter, Write};
use std::process::{Child, Command, Stdio};
use tracing::debug;

/// Invokes the measurement pipeline for each sweep point.
///
/// Each invocation spawns and owns its processes exclusively, so one runner
/// serves sequential and worker-pool execution alike.
pub struct PipelineRunner {
    wrapper: String,
    program: String,
    load_flag: String,
    sampler: Sampler,
}

impl PipelineRunner {
    /// Create a runner for the given collaborator commands.
    pub fn new(
        wrapper: impl Into<String>,
        program: impl Into<String>,
        load_flag: impl Into<String>,
        sampler: Sampler,
    ) -> Self {
        Self {
            wrapper: wrapper.into(),
            program: program.into(),
            load_flag: load_flag.into(),
            sampler,
        }
    }

    /// Spawn the wrapper for `point` with the given stdin. The program's own
    /// output is not the measurement and goes to the null device; the
    /// wrapper's diagnostics are captured from stderr.
    fn spawn_wrapper(&self, point: &SweepPoint, stdin: Stdio) -> Result<Child, MeasureError> {
        Command::new(&self.wrapper)
            .arg(&self.program)
            .arg(&self.load_flag)
            .arg(point.load_factor.to_string())
            .stdin(stdin)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| MeasureError::Spawn {
                command: self.wrapper.clone(),
                source,
            })
    }

    /// Wait on the wrapper and return its captured diagnostics, checking the
    /// exit status.
    fn finish_wrapper(&self, child: Child) -> Result<String, MeasureError> {
        let output = child
            .wait_with_output()
            .map_err(|source| MeasureError::Spawn {
                command: self.wrapper.clone(),
                source,
            })?;

        let captured = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(MeasureError::Pipeline {
                command: self.wrapper.clone(),
                status: output.status,
                stderr: captured.trim().to_string(),
            });
        }
        Ok(captured)
    }

    /// Dataset from an external sampler utility, piped straight into the
    /// wrapper without touching this process.
    fn run_with_command_sampler(
        &self,
        sampler_cmd: &str,
        point: &SweepPoint,
    ) -> Result<String, MeasureError> {
        let mut sampler = Command::new(sampler_cmd)
            .arg("-i")
            .arg(format!("1-{}", SAMPLE_UNIVERSE))
            .arg("-n")
            .arg(point.items.to_string())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| MeasureError::Spawn {
                command: sampler_cmd.to_string(),
                source,
            })?;

        let sampler_stdout = match sampler.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = sampler.kill();
                let _ = sampler.wait();
                return Err(MeasureError::Spawn {
                    command: sampler_cmd.to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "sampler stdout was not captured",
                    ),
                });
            }
        };

        let wrapper = match self.spawn_wrapper(point, Stdio::from(sampler_stdout)) {
            Ok(child) => child,
            Err(e) => {
                let _ = sampler.kill();
                let _ = sampler.wait();
                return Err(e);
            }
        };

        // The wrapper's status is the more meaningful one: if it dies early
        // the sampler gets SIGPIPE and would mask the real failure.
        let captured = self.finish_wrapper(wrapper);
        let sampler_status = sampler.wait().map_err(|source| MeasureError::Spawn {
            command: sampler_cmd.to_string(),
            source,
        });

        let captured = captured?;
        let sampler_status = sampler_status?;
        if !sampler_status.success() {
            // A failed sampler means a truncated dataset, so the measurement
            // cannot be trusted even when the wrapper exited cleanly.
            return Err(MeasureError::Pipeline {
                command: sampler_cmd.to_string(),
                status: sampler_status,
                stderr: String::new(),
            });
        }

        Ok(captured)
    }

    /// Dataset generated in-process and fed to the wrapper's stdin from a
    /// writer thread.
    fn run_with_builtin_sampler(&self, point: &SweepPoint) -> Result<String, MeasureError> {
        let dataset = sample_distinct(&mut rand::thread_rng(), SAMPLE_UNIVERSE, point.items)?;

        let mut wrapper = self.spawn_wrapper(point, Stdio::piped())?;
        let stdin = match wrapper.stdin.take() {
            Some(stdin) => stdin,
            None => {
                let _ = wrapper.kill();
                let _ = wrapper.wait();
                return Err(MeasureError::Spawn {
                    command: self.wrapper.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "wrapper stdin was not captured",
                    ),
                });
            }
        };

        // Feed from a separate thread so a wrapper that exits early cannot
        // deadlock against us; its exit status decides whether the
        // measurement stands, so the writer's own result is irrelevant.
        let feeder = std::thread::spawn(move || -> std::io::Result<()> {
            let mut writer = BufWriter::new(stdin);
            for value in dataset {
                writeln!(writer, "{}", value)?;
            }
            writer.flush()
        });

        let captured = self.finish_wrapper(wrapper);
        let _ = feeder.join();
        captured
    }
}

impl Measure for PipelineRunner {
    fn measure(&self, point: &SweepPoint) -> Result<Measurement, MeasureError> {
        // The fixed sweep never exceeds the universe, but callers with a
        // custom grid get a typed error instead of a hung or garbage run.
        check_universe(point.items, SAMPLE_UNIVERSE)?;

        debug!(
            items = point.items,
            load_factor = point.load_factor,
            "invoking measurement pipeline"
        );

        let captured = match &self.sampler {
            Sampler::Command(cmd) => self.run_with_command_sampler(cmd, point)?,
            Sampler::Builtin => self.run_with_builtin_sampler(point)?,
        };

        Ok(parse_wrapper_output(&captured)?)
    }
}
