//! Candle source contract.
//!
//! The engine never fetches data itself: a `CandleSource` supplies the
//! trailing window on each tick. The synthetic feed here is a stand-in; a
//! production deployment swaps in a live feed behind the same trait without
//! touching the engine or the gate.

use thiserror::Error;

use crate::domain::Candle;

pub mod synthetic;

pub use synthetic::SyntheticFeed;

/// Errors surfaced by candle feeds.
///
/// Feed failures belong to the collaborator, not the engine: they propagate
/// to the caller as-is and must never reach the dedup gate.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Unavailable(String),

    #[error("window too short: needed {needed}, got {got}")]
    ShortWindow { needed: usize, got: usize },

    #[error("candles not strictly time-ordered at index {index}")]
    OutOfOrder { index: usize },

    #[error("malformed candle at index {index}")]
    Malformed { index: usize },
}

/// Supplier of the trailing candle window.
///
/// Contract: `window(len)` produces the `len` most recent one-minute
/// candles, strictly time-ordered with the newest last. No gap handling is
/// assumed. A feed that cannot satisfy the request returns a `FeedError`
/// instead of a short or stale window.
pub trait CandleSource: Send {
    /// Human-readable name (e.g., "synthetic").
    fn name(&self) -> &str;

    /// Fetch the trailing window of `len` candles.
    fn window(&mut self, len: usize) -> Result<Vec<Candle>, FeedError>;
}

/// Validate the source contract on a returned window: strictly increasing
/// timestamps and sane OHLC ranges.
pub fn validate_window(candles: &[Candle]) -> Result<(), FeedError> {
    for (index, pair) in candles.windows(2).enumerate() {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(FeedError::OutOfOrder { index: index + 1 });
        }
    }
    for (index, candle) in candles.iter().enumerate() {
        if !candle.is_sane() {
            return Err(FeedError::Malformed { index });
        }
    }
    Ok(())
}
