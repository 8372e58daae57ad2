//! Trend detection — majority vote over recent candle bodies.

use crate::domain::{Candle, CandleColor, Trend};

/// Classify the trend over the trailing `window` candles.
///
/// Each candle votes by body color; doji candles vote for neither side and
/// are excluded from the strength denominator, so strength is the share of
/// the majority among directional candles only. A side needs a majority of
/// the configured window (3 of 5 at the default) to win. Fewer than 3
/// candles total is not enough evidence for anything but sideways.
pub fn detect(candles: &[Candle], window: usize) -> (Trend, f64) {
    if candles.len() < 3 {
        return (Trend::Sideways, 0.0);
    }

    let start = candles.len().saturating_sub(window);
    let mut bullish = 0usize;
    let mut bearish = 0usize;
    for candle in &candles[start..] {
        match candle.color() {
            CandleColor::Green => bullish += 1,
            CandleColor::Red => bearish += 1,
            CandleColor::Doji => {}
        }
    }

    let total = bullish + bearish;
    if total == 0 {
        return (Trend::Sideways, 0.0);
    }

    let majority = window / 2 + 1;
    if bullish >= majority {
        return (Trend::Up, bullish as f64 / total as f64);
    }
    if bearish >= majority {
        return (Trend::Down, bearish as f64 / total as f64);
    }

    (Trend::Sideways, 0.5)
}
