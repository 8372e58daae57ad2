//! Deterministic rule pipeline — trend, confirmation, levels, oscillator.
//!
//! The pipeline is a pure function over a trailing candle window: no clock,
//! no I/O, no shared state. Each sub-rule degrades to a neutral contribution
//! when the window is too short for it, so `analyze` never fails — degenerate
//! input simply ends in WAIT.

pub mod levels;
pub mod oscillator;
pub mod streak;
pub mod trend;

mod decision;

pub use decision::analyze;
pub use levels::Levels;
pub use oscillator::OscillatorRead;

use serde::{Deserialize, Serialize};

/// Structural thresholds of the rule pipeline.
///
/// The rule weights themselves are fixed; these fields set the window shapes
/// and the two instrument-sensitive knobs: the level-proximity threshold
/// (an absolute price distance, so it must be set per instrument scale) and
/// the minimum confidence an entry needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candles voted on by the trend detector.
    pub trend_window: usize,
    /// Bars on each side of a pivot extremum.
    pub pivot_wings: usize,
    /// Absolute price distance considered "near" a support/resistance level.
    pub level_threshold: f64,
    /// Averaging period of the mean-deviation oscillator.
    pub oscillator_period: usize,
    /// Minimum confidence for an actionable signal.
    pub min_confidence: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_window: 5,
            pivot_wings: 2,
            level_threshold: 0.0005,
            oscillator_period: 2,
            min_confidence: 50.0,
        }
    }
}
