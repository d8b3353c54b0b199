use anyhow::Result;
use clap::{Parser, Subcommand};
use logstat_cli::OutputFormat;
use logstat_cli::commands;
use logstat_cli::commands::run::RunOutcome;
use logstat_cli::config::Config;
use logstat_cli::logging::{LogTarget, init_logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;

/// Exit status when too many log lines failed to parse
const EXIT_ERROR_RATE: u8 = 2;

#[derive(Parser)]
#[command(name = "logstat")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Per-URL latency reports from nginx access logs",
    long_about = "Logstat finds the most recent nginx access log in a directory, aggregates \
                  request count and request time per URL, and renders the heaviest URLs \
                  into a static HTML report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format for printed statistics
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report for the most recent access log
    Run {
        /// Path to a TOML config file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print URL statistics for a single access log
    Stats {
        /// Path to the access log (.gz files are decompressed)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of URLs to show
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

impl Commands {
    /// Where events go when the command fails before its own logging is set up
    fn fallback_log_target(&self) -> LogTarget {
        match self {
            Commands::Run { .. } => LogTarget::Stdout,
            Commands::Stats { .. } => LogTarget::Stderr,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut guard = None;
    let result = execute(&cli, &mut guard);
    if let Err(e) = &result {
        if !tracing::dispatcher::has_been_set() {
            let _ = init_logging(cli.verbose, &cli.command.fallback_log_target());
        }
        tracing::error!(error = %format!("{e:#}"), "Unexpected error");
    }

    result
}

/// Install logging for the command and run it. The file writer guard is
/// handed back through `guard` so events stay flushed until `main` returns.
fn execute(cli: &Cli, guard: &mut Option<WorkerGuard>) -> Result<ExitCode> {
    match &cli.command {
        Commands::Run { config } => {
            let config = Config::load(config.as_deref())?;
            *guard = init_logging(
                cli.verbose,
                &LogTarget::from_config(config.log_file.as_deref()),
            )?;

            match commands::run::run(&config)? {
                RunOutcome::ErrorRateExceeded { .. } => Ok(ExitCode::from(EXIT_ERROR_RATE)),
                _ => Ok(ExitCode::SUCCESS),
            }
        }
        Commands::Stats { file, top } => {
            *guard = init_logging(cli.verbose, &LogTarget::Stderr)?;
            commands::stats::execute(file, *top, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
