//! Candle — the fundamental market data unit.

use serde::{Deserialize, Serialize};

/// One-minute OHLC candle with an epoch-millisecond timestamp.
///
/// Candles are immutable once produced by a feed; the engine only ever reads
/// a bounded trailing window of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Epoch milliseconds at candle open.
    pub timestamp: i64,
}

/// Direction of a candle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleColor {
    Green,
    Red,
    Doji,
}

impl std::fmt::Display for CandleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Green => "GREEN",
            Self::Red => "RED",
            Self::Doji => "DOJI",
        };
        f.write_str(label)
    }
}

impl Candle {
    /// Body direction: close above open is green, below is red, equal is doji.
    pub fn color(&self) -> CandleColor {
        if self.close > self.open {
            CandleColor::Green
        } else if self.close < self.open {
            CandleColor::Red
        } else {
            CandleColor::Doji
        }
    }

    /// Basic OHLC sanity check: no NaN fields, low at or below both body
    /// ends, high at or above both.
    pub fn is_sane(&self) -> bool {
        if self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan() {
            return false;
        }
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle() -> Candle {
        Candle {
            open: 1.0850,
            high: 1.0858,
            low: 1.0846,
            close: 1.0855,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn candle_is_sane() {
        assert!(sample_candle().is_sane());
    }

    #[test]
    fn candle_detects_nan() {
        let mut candle = sample_candle();
        candle.high = f64::NAN;
        assert!(!candle.is_sane());
    }

    #[test]
    fn candle_detects_low_above_body() {
        let mut candle = sample_candle();
        candle.low = 1.0852; // above open
        assert!(!candle.is_sane());
    }

    #[test]
    fn candle_detects_high_below_body() {
        let mut candle = sample_candle();
        candle.high = 1.0852; // below close
        assert!(!candle.is_sane());
    }

    #[test]
    fn color_classification() {
        let mut candle = sample_candle();
        assert_eq!(candle.color(), CandleColor::Green);

        candle.close = candle.open - 0.0003;
        candle.low = candle.close - 0.0001;
        assert_eq!(candle.color(), CandleColor::Red);

        candle.close = candle.open;
        assert_eq!(candle.color(), CandleColor::Doji);
    }

    #[test]
    fn candle_serialization_roundtrip() {
        let candle = sample_candle();
        let json = serde_json::to_string(&candle).unwrap();
        let deser: Candle = serde_json::from_str(&json).unwrap();
        assert_eq!(candle, deser);
    }
}
