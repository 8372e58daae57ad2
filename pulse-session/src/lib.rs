//! Pulse Session — advisory orchestration above the core engine.
//!
//! This crate builds on `pulse-core` to provide:
//! - TOML session configuration and analyzer construction
//! - Minute-candle clock helpers
//! - The tick loop: analyzer → dedup gate → history/stats
//! - Bounded signal history and session counters

pub mod clock;
pub mod config;
pub mod history;
pub mod session;
pub mod stats;

pub use config::{build_analyzer, AnalyzerConfig, ConfigError, FeedConfig, SessionConfig};
pub use history::{SignalHistory, SignalRecord};
pub use session::{Session, SessionError, SessionHandle, TickOutcome};
pub use stats::SessionStats;
