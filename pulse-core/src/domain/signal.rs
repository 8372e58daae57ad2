//! Signal vocabulary: trade direction, trend bias, oscillator verdict.

use serde::{Deserialize, Serialize};

/// The advisory output: enter long, enter short, or stand aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
    Wait,
}

impl Signal {
    /// True for BUY and SELL — the signals the dedup gate tracks.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Wait)
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Wait => "WAIT",
        };
        f.write_str(label)
    }
}

/// Directional bias inferred from recent candle coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

impl Trend {
    pub fn is_directional(&self) -> bool {
        !matches!(self, Self::Sideways)
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Sideways => "SIDEWAYS",
        };
        f.write_str(label)
    }
}

/// Verdict of the oscillator continuation check.
///
/// Confirmed: overshoot-and-return on the same side as the trend.
/// Rejected: the return happened but on the wrong side — a divergence.
/// Neutral: no completed pattern this window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OscillatorSignal {
    Confirmed,
    Rejected,
    Neutral,
}
