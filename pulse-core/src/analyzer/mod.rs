//! Market analyzers — interchangeable signal producers.
//!
//! Two implementations of one capability, "produce a signal from current
//! market context": the deterministic rule engine over a candle feed, and
//! the external vision model over captured chart frames. The orchestrator
//! can swap or A/B them without touching the dedup gate.

use thiserror::Error;

use crate::domain::AnalysisResult;
use crate::source::FeedError;

pub mod rules;
pub mod vision;

pub use rules::RuleAnalyzer;
pub use vision::{FrameSource, VisionAnalyzer, VisionConfig, VisionError};

/// Analyzer failures, by collaborator.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Vision(#[from] VisionError),
}

/// Produce a signal from current market context.
///
/// Implementations may hold mutable collaborator state (a feed cursor, an
/// API-key rotation index) but never gate state — deduplication stays with
/// the session's `SignalGate`.
pub trait MarketAnalyzer: Send {
    /// Human-readable name (e.g., "rule_engine", "vision_model").
    fn name(&self) -> &str;

    /// Run one analysis pass.
    fn analyze(&mut self) -> Result<AnalysisResult, AnalyzeError>;
}
