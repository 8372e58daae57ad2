//! Advisory session — one analyzer, one gate, serialized ticks.
//!
//! The session owns the only mutable cross-tick state in the system: the
//! dedup gate, the history ring, and the counters. One `tick` runs exactly
//! one analysis pass through the gate. Ticks are serialized by construction:
//! `Session::tick` needs an exclusive borrow, and `SessionHandle` wraps the
//! session in a mutex for callers that trigger from more than one place —
//! a manual trigger landing during an in-flight tick is rejected as `Busy`
//! rather than interleaved.

use std::sync::{Arc, Mutex, TryLockError};

use chrono::{DateTime, TimeZone};
use thiserror::Error;
use tracing::debug;

use pulse_core::analyzer::{AnalyzeError, MarketAnalyzer};
use pulse_core::domain::AnalysisResult;
use pulse_core::gate::SignalGate;

use crate::clock;
use crate::history::{SignalHistory, SignalRecord};
use crate::stats::SessionStats;

/// Session failures.
///
/// Analyzer errors pass through untouched; they never reach the gate, so a
/// failed tick cannot corrupt suppression state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error("analysis already in flight")]
    Busy,

    #[error("session state poisoned by a panicked tick")]
    Poisoned,
}

/// Outcome of one analysis tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Gate accepted the result; the record is also in the history.
    Emitted(SignalRecord),
    /// Actionable result suppressed as a same-minute duplicate.
    Suppressed,
}

/// One advisory session: analyzer + gate + history + stats.
pub struct Session {
    analyzer: Box<dyn MarketAnalyzer>,
    gate: SignalGate,
    history: SignalHistory,
    stats: SessionStats,
    asset: String,
}

impl Session {
    pub fn new(
        analyzer: Box<dyn MarketAnalyzer>,
        asset: impl Into<String>,
        history_capacity: usize,
    ) -> Self {
        Self {
            analyzer,
            gate: SignalGate::new(),
            history: SignalHistory::new(history_capacity),
            stats: SessionStats::default(),
            asset: asset.into(),
        }
    }

    /// Run one analysis pass through the dedup gate.
    pub fn tick<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<TickOutcome, SessionError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let result = self.analyzer.analyze()?;
        self.stats.ticks += 1;

        let minute = clock::minute_of_hour(now);
        debug!(
            analyzer = self.analyzer.name(),
            minute,
            signal = %result.signal,
            confidence = result.confidence,
            "tick"
        );

        match self.gate.apply(result, minute) {
            Some(accepted) => {
                self.stats.record_emitted(accepted.signal);
                let mut record = to_record(accepted, &self.asset, now);
                record.id = self.history.push(record.clone());
                Ok(TickOutcome::Emitted(record))
            }
            None => {
                self.stats.suppressed += 1;
                Ok(TickOutcome::Suppressed)
            }
        }
    }

    /// Forget the gate's recorded emission (e.g. after switching assets).
    pub fn reset_gate(&mut self) {
        self.gate.reset();
    }

    pub fn analyzer_name(&self) -> &str {
        self.analyzer.name()
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn history(&self) -> &SignalHistory {
        &self.history
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}

/// Turn an accepted analysis into a display record.
fn to_record<Tz: TimeZone>(result: AnalysisResult, asset: &str, now: &DateTime<Tz>) -> SignalRecord
where
    Tz::Offset: std::fmt::Display,
{
    let mut reasons = result.reasons.into_iter();
    let reason = reasons
        .next()
        .unwrap_or_else(|| "analysis in progress".into());

    SignalRecord {
        id: 0,
        signal: result.signal,
        time: clock::clock_label(now),
        reason,
        details: reasons.collect(),
        alerts: result.alerts,
        asset: asset.to_string(),
        confidence: result.confidence,
    }
}

/// Shared handle serializing ticks across threads.
///
/// The gate is not safe under interleaved calls — two same-minute ticks
/// could both pass the same signal. The handle therefore never queues a
/// second trigger behind a running one: `try_tick` returns `Busy` instead.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Blocking tick for the scheduled once-a-minute driver.
    pub fn tick<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TickOutcome, SessionError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        session.tick(now)
    }

    /// Non-blocking manual trigger: `Busy` while another tick is in flight.
    pub fn try_tick<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TickOutcome, SessionError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut session = self.inner.try_lock().map_err(|e| match e {
            TryLockError::WouldBlock => SessionError::Busy,
            TryLockError::Poisoned(_) => SessionError::Poisoned,
        })?;
        session.tick(now)
    }

    /// Read session state under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R, SessionError> {
        let session = self.inner.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(f(&session))
    }
}
