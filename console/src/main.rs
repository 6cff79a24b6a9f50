//! Engage Console - reporting host for the engagement tracker.
//!
//! This binary constructs one [`EngagementTracker`] and drives it the way
//! a page would: one initialization per run, clicks from user input, and
//! the statistics report on demand.
//!
//! # Commands
//!
//! - `engage session`: Interactive tracking session on stdin
//! - `engage stats`: Print the statistics report
//! - `engage reset`: Clear the stored engagement record
//!
//! # Environment Variables
//!
//! See the tracker's configuration module for available options.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engage_tracker::{Config, EngagementTracker, FileStore};

mod report;

/// Confirmation prompt shown before clearing the record.
const RESET_PROMPT: &str = "Clear all engagement data? [y/N] ";

/// Engage Console - reporting host for the engagement tracker.
///
/// Records visits and clicks into the local engagement record and renders
/// the statistics report.
#[derive(Parser, Debug)]
#[command(name = "engage")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    ENGAGE_DATA_DIR         Record directory (default: ~/.engage)
    ENGAGE_RECENT_CAP       Recent-events history cap (default: 50)
    ENGAGE_SNAPSHOT_EVENTS  Events shown in the report (default: 10)

EXAMPLES:
    # Record clicks interactively
    engage session

    # Print the statistics report
    engage stats

    # Clear the record without prompting
    engage reset --yes
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive tracking session.
    ///
    /// Counts one visit, then reads stdin: a platform name records a
    /// click, 'stats' prints the report, 'reset' clears the record,
    /// 'quit' exits.
    Session,

    /// Print the engagement statistics report.
    ///
    /// Counts one visit (a console run is a page load) before reporting.
    Stats,

    /// Clear the stored engagement record.
    ///
    /// Irreversible. Prompts for confirmation unless --yes is given.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Session => run_session(),
        Command::Stats => run_stats(),
        Command::Reset { yes } => run_reset(yes),
    }
}

/// Builds the tracker from environment configuration with a file-backed
/// store.
fn build_tracker() -> Result<EngagementTracker<FileStore>> {
    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        data_dir = %config.data_dir.display(),
        recent_cap = config.recent_cap,
        "Configuration loaded"
    );

    let store = FileStore::new(&config.data_dir);
    Ok(EngagementTracker::new(store, config))
}

/// Runs an interactive tracking session.
fn run_session() -> Result<()> {
    let mut tracker = build_tracker()?;
    tracker.initialize();
    let session_start = Instant::now();

    println!("Session started. Type a platform name to record a click,");
    println!("'stats' for the report, 'reset' to clear, 'quit' to exit.");

    let mut lines = io::stdin().lock().lines();
    while let Some(line) = lines.next() {
        let line = line.context("Failed to read input")?;
        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "stats" => println!("{}", report::render_snapshot(&tracker.query())),
            "reset" => {
                print!("{RESET_PROMPT}");
                io::stdout().flush()?;
                let confirmed = match lines.next() {
                    Some(answer) => answer
                        .context("Failed to read input")?
                        .trim()
                        .eq_ignore_ascii_case("y"),
                    None => false,
                };
                if confirmed {
                    tracker.reset();
                    println!("Engagement record cleared.");
                } else {
                    println!("Aborted.");
                }
            }
            platform => {
                let elapsed = session_start.elapsed().as_secs();
                match tracker.record_click(platform, elapsed) {
                    Some(count) => println!("{platform}: click #{count}"),
                    None => println!("Ignored empty platform identifier."),
                }
            }
        }
    }

    Ok(())
}

/// Prints the statistics report.
fn run_stats() -> Result<()> {
    let mut tracker = build_tracker()?;
    tracker.initialize();

    println!("{}", report::render_snapshot(&tracker.query()));
    Ok(())
}

/// Clears the stored engagement record.
fn run_reset(yes: bool) -> Result<()> {
    let mut tracker = build_tracker()?;

    if !yes {
        eprint!("{RESET_PROMPT}");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    tracker.reset();
    println!("Engagement record cleared.");
    Ok(())
}

/// Initializes the logging subsystem.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
