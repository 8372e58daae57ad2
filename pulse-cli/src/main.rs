//! Pulse CLI — minute-candle trading-signal advisor.
//!
//! Commands:
//! - `run` — continuous advisory loop, one analysis per minute boundary
//! - `analyze` — a single analysis tick, printed as a signal card

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};

use pulse_session::{
    build_analyzer, clock, Session, SessionConfig, SessionError, SessionHandle, SessionStats,
    TickOutcome,
};

#[derive(Parser)]
#[command(name = "pulse", about = "Pulse — minute-candle trading-signal advisor")]
struct Cli {
    /// Path to a TOML session config. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the advisory loop.
    Run {
        /// Stop after this many ticks (0 = run until interrupted).
        #[arg(long, default_value_t = 0)]
        ticks: u64,

        /// Seconds between analyses. 0 = sync to minute boundaries.
        #[arg(long, default_value_t = 0)]
        cadence_secs: u64,
    },
    /// Run a single analysis tick and print the signal card.
    Analyze,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };

    match cli.command {
        Commands::Run {
            ticks,
            cadence_secs,
        } => run_loop(config, ticks, cadence_secs),
        Commands::Analyze => run_once(config),
    }
}

fn build_session(config: &SessionConfig) -> Result<Session> {
    let now = Local::now();
    let analyzer = build_analyzer(config, now.timestamp_millis(), None)?;
    Ok(Session::new(
        analyzer,
        config.asset.clone(),
        config.history_capacity,
    ))
}

fn run_once(config: SessionConfig) -> Result<()> {
    let mut session = build_session(&config)?;
    let outcome = session.tick(&Local::now())?;
    print_outcome(&outcome);
    print_stats(session.stats());
    Ok(())
}

fn run_loop(config: SessionConfig, max_ticks: u64, cadence_secs: u64) -> Result<()> {
    let session = SessionHandle::new(build_session(&config)?);
    let mut completed = 0u64;

    loop {
        let wait = if cadence_secs > 0 {
            cadence_secs
        } else {
            u64::from(clock::seconds_until_next_minute(&Local::now()))
        };
        println!("next analysis in {wait}s");
        std::thread::sleep(Duration::from_secs(wait));

        match session.tick(&Local::now()) {
            Ok(outcome) => print_outcome(&outcome),
            Err(SessionError::Busy) => println!("analysis already in flight, skipping"),
            Err(e) => return Err(e.into()),
        }

        completed += 1;
        if max_ticks > 0 && completed >= max_ticks {
            break;
        }
    }

    session.with(|s| print_stats(s.stats()))?;
    Ok(())
}

fn print_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Suppressed => println!("(duplicate signal this minute, suppressed)"),
        TickOutcome::Emitted(record) => {
            println!();
            println!("=== {} @ {} ===", record.signal, record.time);
            println!("Asset:      {}", record.asset);
            println!("Confidence: {:.0}%", record.confidence);
            println!("Reason:     {}", record.reason);
            for detail in &record.details {
                println!("  - {detail}");
            }
            if !record.alerts.is_empty() {
                println!("Alerts:");
                for alert in &record.alerts {
                    println!("  ! {alert}");
                }
            }
        }
    }
}

fn print_stats(stats: &SessionStats) {
    println!();
    println!("--- Session ---");
    println!("Ticks:      {}", stats.ticks);
    println!("Buy:        {}", stats.buys);
    println!("Sell:       {}", stats.sells);
    println!("Wait:       {}", stats.waits);
    println!("Suppressed: {}", stats.suppressed);
    println!("Actionable: {}", stats.actionable());
}
