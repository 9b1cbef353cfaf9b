//! `slots` CLI: compute free time and common meeting start ranges from JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Busy events → free intervals within a window (stdin → stdout)
//! echo '{"window_start":"2026-03-16T09:00:00Z","window_end":"2026-03-16T17:00:00Z",
//!        "busy":[{"start":"2026-03-16T10:00:00Z","end":"2026-03-16T11:00:00Z"}]}' | slots free
//!
//! # Weekly working hours → dated intervals
//! slots expand -i hours.json
//!
//! # Free sequences → permissible start ranges
//! slots schedule -i free.json -o ranges.json
//!
//! # Whole pipeline: raw busy lists + working hours → start ranges
//! slots --config slots.toml find -i team.json
//!
//! # Log each reduction step to stderr
//! slots --debug find -i team.json
//! ```

mod config;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slot_engine::{AvailabilityRequest, BusyEvent, Interval, Participant, WeeklyAvailability};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Find the times a group meeting can start"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config with default duration, buffer, and working hours
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one participant's busy events into free intervals
    Free {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Expand weekly availability into dated intervals
    Expand {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Intersect free sequences into permissible start ranges
    Schedule {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Find start ranges for a meeting from raw busy calendars
    Find {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FreeInput {
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    #[serde(default)]
    busy: Vec<BusyEvent>,
    buffer_minutes: Option<u32>,
}

#[derive(Deserialize)]
struct ExpandInput {
    availability: Option<WeeklyAvailability>,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct ScheduleInput {
    participants: Vec<Vec<Interval>>,
    #[serde(default)]
    constraints: Vec<Vec<Interval>>,
    duration_minutes: Option<u32>,
}

#[derive(Deserialize)]
struct FindInput {
    participants: Vec<Participant>,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    duration_minutes: Option<u32>,
    working_hours: Option<WeeklyAvailability>,
    #[serde(default)]
    constraints: Vec<Vec<Interval>>,
}

impl FindInput {
    /// Fill in whatever the request leaves out from `config`.
    fn into_request(self, config: &Config) -> AvailabilityRequest {
        let participants = self
            .participants
            .into_iter()
            .map(|p| {
                let buffer = p.buffer_minutes.max(config.buffer_minutes);
                p.with_buffer(buffer)
            })
            .collect();

        AvailabilityRequest {
            participants,
            window_start: self.window_start,
            window_end: self.window_end,
            duration_minutes: self
                .duration_minutes
                .unwrap_or(config.default_duration_minutes),
            working_hours: self.working_hours.or_else(|| config.working_hours.clone()),
            constraints: self.constraints,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::load(cli.config.as_deref())?;
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Free { input, output } => {
            let body: FreeInput = read_json(input.as_deref())?;
            let buffer = body.buffer_minutes.unwrap_or(config.buffer_minutes);
            let free = slot_engine::busy_to_free_with_buffer(
                &body.busy,
                body.window_start,
                body.window_end,
                Duration::minutes(i64::from(buffer)),
            )
            .context("Failed to convert busy events to free intervals")?;
            write_json(output.as_deref(), &free)?;
        }
        Commands::Expand { input, output } => {
            let body: ExpandInput = read_json(input.as_deref())?;
            let availability = body
                .availability
                .or(config.working_hours)
                .context("No availability given in the request or the config file")?;
            let intervals =
                slot_engine::expand_constraints(&availability, body.start_date, body.end_date)
                    .context("Failed to expand weekly availability")?;
            write_json(output.as_deref(), &intervals)?;
        }
        Commands::Schedule { input, output } => {
            let body: ScheduleInput = read_json(input.as_deref())?;
            let minutes = body
                .duration_minutes
                .unwrap_or(config.default_duration_minutes);
            let ranges = slot_engine::schedule(
                &body.participants,
                Duration::minutes(i64::from(minutes)),
                &body.constraints,
            )
            .context("Failed to schedule meeting")?;
            write_json(output.as_deref(), &ranges)?;
        }
        Commands::Find { input, output } => {
            let body: FindInput = read_json(input.as_deref())?;
            let request = body.into_request(&config);
            let availability = slot_engine::find_meeting_times(&request)
                .context("Failed to find meeting times")?;
            write_json(output.as_deref(), &availability)?;
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean JSON.
///
/// `--debug` forces DEBUG; otherwise `RUST_LOG` applies, defaulting to WARN.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_json<T: DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse JSON input")
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    write_output(path, &json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(Path::new(path), content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
