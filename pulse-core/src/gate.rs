//! Per-minute signal deduplication gate.
//!
//! Stateful wrapper around the engine output: at most one identical
//! actionable signal per wall-clock minute. WAIT results pass through
//! untouched and never update the stored state, so a WAIT between two
//! identical BUY calls does not reset suppression.
//!
//! The gate is the one order-sensitive piece of the core. It is an owned
//! object constructed per session — never ambient global state — and its
//! callers must serialize access to it (exclusive borrow, mutex, or a
//! single-threaded tick loop): two interleaved calls in the same minute
//! could both observe "not yet recorded" and both pass.

use crate::domain::{AnalysisResult, Signal};

/// Cross-tick suppression state: the minute and kind of the last accepted
/// actionable signal.
#[derive(Debug, Default)]
pub struct SignalGate {
    last_minute: Option<u32>,
    last_signal: Option<Signal>,
}

impl SignalGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one engine result through the gate.
    ///
    /// An actionable result passes when the minute advanced or the signal
    /// kind changed since the last accepted emission, recording the new
    /// `(minute, signal)` pair. A repeat of the same signal in the same
    /// minute is suppressed to `None`.
    pub fn apply(&mut self, result: AnalysisResult, minute: u32) -> Option<AnalysisResult> {
        if !result.signal.is_actionable() {
            return Some(result);
        }

        if self.last_minute == Some(minute) && self.last_signal == Some(result.signal) {
            return None;
        }

        self.last_minute = Some(minute);
        self.last_signal = Some(result.signal);
        Some(result)
    }

    /// Forget the recorded emission (new asset, new session).
    pub fn reset(&mut self) {
        self.last_minute = None;
        self.last_signal = None;
    }

    /// Kind of the last accepted actionable signal, if any.
    pub fn last_signal(&self) -> Option<Signal> {
        self.last_signal
    }
}
