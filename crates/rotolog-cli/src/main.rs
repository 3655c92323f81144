//! rotolog CLI
//!
//! Thin wrapper around rotolog-core for command-line usage.
//!
//! ## Usage
//!
//! ```bash
//! # Ten workers logging every second into ./logs, new file every minute
//! rotolog --dir logs --prefix demo --interval 1m run
//!
//! # Stop on its own after 30 seconds
//! rotolog --interval 10s run --workers 4 --period 250ms --duration 30s
//!
//! # Settings from a JSON file
//! rotolog --config rotolog.json run
//!
//! # Write a single line and exit
//! rotolog --dir logs emit --severity warn disk almost full
//!
//! # Write a fatal line; exits with status 1
//! rotolog --dir logs emit --severity fatal giving up
//! ```

use std::fmt::Display;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rotolog_core::format::Body;
use rotolog_core::{Logger, PrefixFlags, Severity, SinkConfig};
use tokio::sync::watch;

/// rotolog - leveled logging into time-rotated files
#[derive(Parser)]
#[command(name = "rotolog")]
#[command(version)]
#[command(about = "Leveled logging into time-rotated files")]
struct Cli {
    /// Increase verbosity of rotolog's own diagnostics (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON file with directory, file_prefix and rotation_interval
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory the log files are written to (overrides config)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// File name prefix (overrides config)
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// Rotation interval, e.g. 1h, 15m, 90s (overrides config)
    #[arg(long, global = true)]
    interval: Option<String>,

    /// Minimum severity written: trace, debug, info, warn, error, fatal
    #[arg(long, global = true, default_value = "info")]
    level: String,

    /// Prefix fields, e.g. "std" or "date|time|microseconds|shortfile"
    #[arg(long, global = true, default_value = "std")]
    flags: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run concurrent workers that log periodically until Ctrl+C
    Run {
        /// Number of workers
        #[arg(short, long, default_value_t = 10)]
        workers: usize,

        /// Delay between a worker's log calls
        #[arg(short, long, default_value = "1s", value_parser = humantime::parse_duration)]
        period: Duration,

        /// Stop after this long instead of waiting for Ctrl+C
        #[arg(short, long, value_parser = humantime::parse_duration)]
        duration: Option<Duration>,
    },

    /// Write one line at the given severity and exit
    Emit {
        /// Severity of the line; fatal exits with status 1
        #[arg(short, long, default_value = "info")]
        severity: String,

        /// Values to log
        #[arg(required = true)]
        message: Vec<String>,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Config file first, then individual flags on top.
fn sink_config(cli: &Cli) -> Result<SinkConfig> {
    let mut config = match &cli.config {
        Some(path) => SinkConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SinkConfig::default(),
    };

    if let Some(dir) = &cli.dir {
        config.directory = dir.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.file_prefix = prefix.clone();
    }
    if let Some(interval) = &cli.interval {
        config.rotation_interval = interval.clone();
    }

    Ok(config)
}

fn build_logger(cli: &Cli) -> Result<Logger> {
    let level: Severity = cli.level.parse().context("Invalid --level")?;
    let flags: PrefixFlags = cli.flags.parse().context("Invalid --flags")?;
    let config = sink_config(cli)?;

    tracing::debug!(?config, %level, %flags, "Creating logger");

    Logger::create(level, flags, &config).with_context(|| {
        format!(
            "Failed to open log files in {}",
            config.directory.display()
        )
    })
}

async fn run_workers(
    logger: Arc<Logger>,
    workers: usize,
    period: Duration,
    duration: Option<Duration>,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut handles = Vec::with_capacity(workers);
    for flag in 1..=workers {
        let logger = logger.clone();
        let mut shutdown = shutdown_rx.clone();
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        rotolog_core::info!(logger, "flag is", flag);
                        rotolog_core::infof!(
                            logger,
                            "flag is {} and now time is {}",
                            flag,
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
                        );
                    }
                    _ = shutdown.changed() => break,
                }
            }
        }));
    }

    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("Received shutdown signal...");
        }
        _ = deadline => {}
    }

    shutdown_tx.send(true).ok();
    for handle in handles {
        handle.await.context("Worker panicked")?;
    }

    Ok(())
}

fn emit(logger: &Logger, severity: &str, message: &[String]) -> Result<()> {
    let severity: Severity = severity.parse().context("Invalid --severity")?;
    let values: Vec<&dyn Display> = message.iter().map(|m| m as &dyn Display).collect();

    if severity == Severity::Fatal {
        logger.fatal(&values);
    }

    logger.log(severity, Some(Location::caller()), Body::Values(&values));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let logger = Arc::new(build_logger(&cli)?);
    let rotator = logger
        .rotator()
        .context("Logger was created without a rotator")?;

    match cli.command {
        Commands::Run {
            workers,
            period,
            duration,
        } => {
            println!("rotolog");
            println!("=======");
            println!("  Directory: {}", rotator.directory().display());
            println!("  Prefix:    {}", rotator.file_prefix());
            println!("  Interval:  {}", humantime::format_duration(rotator.interval()));
            println!("  Workers:   {}", workers);
            println!();
            println!("Logging... press Ctrl+C to stop");

            run_workers(logger.clone(), workers, period, duration).await?;

            logger.shutdown();
            println!(
                "Stopped after {} rotation(s), {} failed",
                rotator.rotations(),
                rotator.failed_rotations()
            );
            println!("Last file: {}", rotator.current_path().display());
        }

        Commands::Emit { severity, message } => {
            println!("{}", rotator.current_path().display());
            emit(&logger, &severity, &message)?;
        }
    }

    Ok(())
}
