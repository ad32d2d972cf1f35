#![warn(missing_docs)]
//! Loadsweep CLI Library
//!
//! Drives the whole harness: discovers `sweep.toml`, merges CLI flags over
//! it, builds the pipeline runner, executes the sweep, and renders the
//! report. With no flags at all, the run reproduces the original harness:
//! `shuf` datasets piped through `./measure ./freq -l <alpha>`, the full
//! 64-point grid, and a tab-delimited table on stdout.

mod config;
mod executor;
mod invoker;
mod sampler;

pub use config::{OutputConfig, PipelineConfig, RunConfig, SweepConfig};
pub use executor::{FailurePolicy, SweepAborted, SweepExecutor};
pub use invoker::PipelineRunner;
pub use sampler::Sampler;

use clap::{Parser, Subcommand};
use loadsweep_core::{MAX_ITEMS, SweepGrid};
use loadsweep_report::{OutputFormat, render_json};
use std::io::Write;
use std::path::PathBuf;

/// Loadsweep CLI arguments
#[derive(Parser, Debug)]
#[command(name = "loadsweep")]
#[command(author, version, about = "Sweep a hash-table program across input sizes and load factors")]
pub struct Cli {
    /// Optional subcommand (List, Run); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Measurement wrapper executable
    #[arg(long)]
    pub wrapper: Option<String>,

    /// Hash-table program under test
    #[arg(long)]
    pub program: Option<String>,

    /// Flag the wrapper forwards the load factor under
    #[arg(long)]
    pub load_flag: Option<String>,

    /// Sampler command, or "builtin" for in-process dataset generation
    #[arg(long)]
    pub sampler: Option<String>,

    /// Truncate the sweep to item counts <= N (smoke runs)
    #[arg(long)]
    pub max_items: Option<u64>,

    /// Number of parallel pipeline invocations
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Output format: human, json
    #[arg(long)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Abort the sweep on the first failed invocation
    #[arg(long)]
    pub fail_fast: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the planned sweep points without running
    List,
    /// Run the sweep (default)
    Run,
}

/// Fully resolved settings: `sweep.toml` values with CLI flags layered over.
struct Settings {
    wrapper: String,
    program: String,
    load_flag: String,
    sampler: Sampler,
    max_items: u64,
    jobs: usize,
    fail_fast: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
}

impl Settings {
    fn resolve(cli: &Cli, config: SweepConfig) -> anyhow::Result<Self> {
        let format_name = cli
            .format
            .clone()
            .unwrap_or(config.output.format);
        let format: OutputFormat = format_name.parse().map_err(anyhow::Error::msg)?;

        let sampler_name = cli
            .sampler
            .clone()
            .unwrap_or(config.pipeline.sampler);

        Ok(Self {
            wrapper: cli.wrapper.clone().unwrap_or(config.pipeline.wrapper),
            program: cli.program.clone().unwrap_or(config.pipeline.program),
            load_flag: cli.load_flag.clone().unwrap_or(config.pipeline.load_flag),
            sampler: Sampler::from_config(&sampler_name),
            max_items: cli.max_items.or(config.run.max_items).unwrap_or(MAX_ITEMS),
            jobs: cli.jobs.or(config.run.jobs).unwrap_or(1),
            fail_fast: cli.fail_fast || config.run.fail_fast,
            format,
            output: cli
                .output
                .clone()
                .or_else(|| config.output.path.map(PathBuf::from)),
        })
    }

    fn policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        }
    }
}

/// Run the Loadsweep CLI with arguments from the environment.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Loadsweep CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("loadsweep=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("loadsweep=info")
            .init();
    }

    // Discover sweep.toml configuration (CLI flags override)
    let config = SweepConfig::discover().unwrap_or_default();
    let settings = Settings::resolve(&cli, config)?;

    match cli.command {
        Some(Commands::List) => list_points(&settings),
        Some(Commands::Run) | None => run_sweep(&settings),
    }
}

fn list_points(settings: &Settings) -> anyhow::Result<()> {
    println!("Sweep plan:");

    let mut total = 0;
    for point in SweepGrid::up_to(settings.max_items) {
        println!("  {} items @ load factor {}", point.items, point.load_factor);
        total += 1;
    }

    println!("{} points.", total);
    Ok(())
}

fn run_sweep(settings: &Settings) -> anyhow::Result<()> {
    let grid = SweepGrid::up_to(settings.max_items);
    println!(
        "Sweeping {} points through {} {} ({} worker(s))...\n",
        grid.len(),
        settings.wrapper,
        settings.program,
        settings.jobs
    );

    let runner = PipelineRunner::new(
        &settings.wrapper,
        &settings.program,
        &settings.load_flag,
        settings.sampler.clone(),
    );
    let executor = SweepExecutor::new(settings.policy(), settings.jobs);
    let report = executor.execute(grid, &runner)?;

    // Generate output
    let rendered = match settings.format {
        OutputFormat::Json => render_json(&report)?,
        OutputFormat::Human => report.render(),
    };

    // Write output
    if let Some(ref path) = settings.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(rendered.as_bytes())?;
        println!("Report written to: {}", path.display());
    } else {
        print!("{}", rendered);
    }

    // Surface recorded failures and exit nonzero so scripted runs notice.
    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        eprintln!(
            "\n{} of {} invocation(s) failed:",
            failures.len(),
            report.rows().len()
        );
        for (row, reason) in &failures {
            eprintln!(
                "  {} items @ load factor {}: {}",
                row.items, row.load_factor, reason
            );
        }
        std::process::exit(1);
    }

    Ok(())
}
