//! `workhours` CLI — check an instant against the configured working schedule.
//!
//! ## Usage
//!
//! ```sh
//! # Is it working hours right now? (exit code 0 = yes, 1 = no)
//! workhours check
//!
//! # Check a specific instant, with a step-by-step explanation
//! workhours check --at 2026-03-17T10:00:00Z --explain
//!
//! # Machine-readable output
//! workhours check --json
//!
//! # When does the next working window start?
//! workhours next
//!
//! # Use a specific schedule file instead of ~/.config/workhours/config.toml
//! workhours --config team.toml check
//! ```
//!
//! Schedule file format:
//!
//! ```toml
//! days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
//! start = "09:00"
//! end = "17:00"
//! timezone = "America/Sao_Paulo"
//! ```

mod config;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use config::Config;
use schedule_engine::{
    evaluate_in_zone_with_trace, evaluate_with_trace, find_next_activation,
    next_activation_in_zone, TracedEvaluation,
};

/// Exit code for an instant outside the working window.
const EXIT_OUTSIDE: i32 = 1;
/// Exit code for configuration or argument errors.
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(
    name = "workhours",
    version,
    about = "Check instants against a recurring working-hours schedule"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a schedule file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether an instant is inside the working window
    Check {
        /// Instant to evaluate (RFC 3339; naive times are UTC). Defaults to now.
        #[arg(long)]
        at: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Include a step-by-step explanation
        #[arg(long)]
        explain: bool,
        /// Read the schedule in this machine's timezone instead of the configured one
        #[arg(long)]
        local: bool,
    },
    /// Print the next instant the working window opens
    Next {
        /// Reference instant (RFC 3339; naive times are UTC). Defaults to now.
        #[arg(long)]
        at: Option<String>,
        /// Read the schedule in this machine's timezone instead of the configured one
        #[arg(long)]
        local: bool,
    },
}

/// JSON shape of `check --json`.
#[derive(Serialize)]
struct CheckOutput<'a> {
    within_window: bool,
    reason: Option<String>,
    next_transition: Option<String>,
    evaluated_at: String,
    timezone: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a [String]>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(EXIT_ERROR);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            at,
            json,
            explain,
            local,
        } => {
            let now = resolve_now(at.as_deref())?;
            let traced = if local {
                evaluate_with_trace(&config.schedule, &now.with_timezone(&Local))
            } else {
                evaluate_in_zone_with_trace(&config.schedule, now)
                    .context("Failed to evaluate schedule")?
            };

            if json {
                let timezone = if local {
                    "local"
                } else {
                    config.schedule.timezone.as_str()
                };
                println!("{}", render_json(&traced, timezone, explain)?);
            } else {
                if explain {
                    println!("{}", traced.trace_text());
                }
                println!("{}", traced.result.summary());
            }

            Ok(if traced.result.within_window {
                0
            } else {
                EXIT_OUTSIDE
            })
        }
        Commands::Next { at, local } => {
            let now = resolve_now(at.as_deref())?;
            let next = if local {
                find_next_activation(&config.schedule, &now.with_timezone(&Local)).fixed_offset()
            } else {
                next_activation_in_zone(&config.schedule, now)
                    .context("Failed to compute next activation")?
                    .fixed_offset()
            };
            println!("{}", next.to_rfc3339());
            Ok(0)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    }
    let config = Config::load_from(path).context("Failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// The instant to evaluate: `--at` when given, otherwise the system clock.
fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(raw) => parse_instant(raw),
        None => Ok(Utc::now()),
    }
}

/// Parse an RFC 3339 instant, or a naive `YYYY-MM-DDTHH:MM:SS` read as UTC.
fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid datetime '{}': expected RFC 3339", s))
}

fn render_json(traced: &TracedEvaluation, timezone: &str, explain: bool) -> Result<String> {
    let result = &traced.result;
    let output = CheckOutput {
        within_window: result.within_window,
        reason: result.reason.as_ref().map(ToString::to_string),
        next_transition: result.next_transition.map(|dt| dt.to_rfc3339()),
        evaluated_at: result.evaluated_at.to_rfc3339(),
        timezone,
        trace: explain.then_some(traced.trace.as_slice()),
    };
    serde_json::to_string_pretty(&output).context("Failed to serialize result")
}
