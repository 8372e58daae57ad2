//! Short-period mean-deviation index and the overshoot-and-return read.
//!
//! The index normalizes how far the typical price sits from its short-term
//! average, in units of mean absolute deviation. The pattern the decision
//! pipeline cares about is an overshoot beyond the ±100 band followed by a
//! retreat into the neutral sub-band on the same side — the strongest
//! continuation evidence the engine has.

use crate::domain::Candle;

/// Scaling constant in the index denominator.
const SCALE: f64 = 0.015;

/// Upper/lower band the overshoot must exceed.
const BAND: f64 = 100.0;

/// Compute the index series over the window.
///
/// Output position `k` corresponds to candle `k + period - 1`; windows
/// shorter than `period` yield an empty series. A flat stretch has zero mean
/// deviation, where the index is defined as 0 rather than dividing by zero.
pub fn index_series(candles: &[Candle], period: usize) -> Vec<f64> {
    if period == 0 || candles.len() < period {
        return Vec::new();
    }

    let mut values = Vec::with_capacity(candles.len() - period + 1);
    for i in period - 1..candles.len() {
        let window = &candles[i + 1 - period..=i];
        let typical: Vec<f64> = window.iter().map(typical_price).collect();

        let sma = typical.iter().sum::<f64>() / period as f64;
        let mean_dev = typical.iter().map(|tp| (tp - sma).abs()).sum::<f64>() / period as f64;

        let current = typical[period - 1];
        let value = if mean_dev == 0.0 {
            0.0
        } else {
            (current - sma) / (SCALE * mean_dev)
        };
        values.push(value);
    }

    values
}

fn typical_price(candle: &Candle) -> f64 {
    (candle.high + candle.low + candle.close) / 3.0
}

/// Result of reading the last three index values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OscillatorRead {
    /// The value left the ±100 band two steps ago and re-entered one step ago.
    pub crossed: bool,
    /// After the cross, the latest value sits in the neutral sub-band on the
    /// overshoot's side: (0, 100) after a down-cross, (−100, 0) after an up-cross.
    pub returned: bool,
    pub last: f64,
}

/// Inspect the tail of the index series for the overshoot-and-return pattern.
///
/// Fewer than three values reads as neutral.
pub fn read(values: &[f64]) -> OscillatorRead {
    if values.len() < 3 {
        return OscillatorRead::default();
    }

    let last = values[values.len() - 1];
    let prev = values[values.len() - 2];
    let prev_prev = values[values.len() - 3];

    let crossed_down = prev_prev > BAND && prev < BAND;
    let crossed_up = prev_prev < -BAND && prev > -BAND;

    let returned = (crossed_down && last < BAND && last > 0.0)
        || (crossed_up && last > -BAND && last < 0.0);

    OscillatorRead {
        crossed: crossed_down || crossed_up,
        returned,
        last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle_at(price: f64, i: i64) -> Candle {
        Candle {
            open: price,
            high: price + 0.0002,
            low: price - 0.0002,
            close: price,
            timestamp: 1_700_000_000_000 + i * 60_000,
        }
    }

    // ── index_series ─────────────────────────────────────────────

    #[test]
    fn series_empty_below_period() {
        let candles = vec![candle_at(1.0850, 0)];
        assert!(index_series(&candles, 2).is_empty());
    }

    #[test]
    fn series_length_matches_window() {
        let candles: Vec<Candle> = (0..5).map(|i| candle_at(1.0850 + i as f64 * 0.0003, i)).collect();
        assert_eq!(index_series(&candles, 2).len(), 4);
    }

    #[test]
    fn flat_prices_yield_zero_not_nan() {
        // Identical candles: mean deviation is exactly zero.
        let candles: Vec<Candle> = (0..5).map(|i| candle_at(1.0850, i)).collect();
        for value in index_series(&candles, 2) {
            assert_eq!(value, 0.0);
            assert!(!value.is_nan());
        }
    }

    #[test]
    fn rising_pair_is_positive() {
        // Period 2: value = (tp1 - mean) / (0.015 * dev) = 1 / 0.015 for any rise.
        let candles = vec![candle_at(1.0850, 0), candle_at(1.0856, 1)];
        let values = index_series(&candles, 2);
        assert_eq!(values.len(), 1);
        assert!((values[0] - 1.0 / 0.015).abs() < 1e-9);
    }

    #[test]
    fn falling_pair_is_negative() {
        let candles = vec![candle_at(1.0856, 0), candle_at(1.0850, 1)];
        let values = index_series(&candles, 2);
        assert!((values[0] + 1.0 / 0.015).abs() < 1e-9);
    }

    // ── read ─────────────────────────────────────────────────────

    #[test]
    fn neutral_below_three_values() {
        assert_eq!(read(&[]), OscillatorRead::default());
        assert_eq!(read(&[120.0, 90.0]), OscillatorRead::default());
    }

    #[test]
    fn down_cross_with_return() {
        let result = read(&[120.0, 90.0, 50.0]);
        assert!(result.crossed);
        assert!(result.returned);
        assert_eq!(result.last, 50.0);
    }

    #[test]
    fn down_cross_without_return() {
        // Latest value fell through zero: wrong sub-band, no continuation.
        let result = read(&[120.0, 90.0, -10.0]);
        assert!(result.crossed);
        assert!(!result.returned);
    }

    #[test]
    fn up_cross_with_return() {
        let result = read(&[-130.0, -90.0, -40.0]);
        assert!(result.crossed);
        assert!(result.returned);
    }

    #[test]
    fn up_cross_without_return() {
        let result = read(&[-130.0, -90.0, 10.0]);
        assert!(result.crossed);
        assert!(!result.returned);
    }

    #[test]
    fn no_cross_inside_band() {
        let result = read(&[50.0, 60.0, 70.0]);
        assert!(!result.crossed);
        assert!(!result.returned);
        assert_eq!(result.last, 70.0);
    }

    #[test]
    fn overshoot_still_outside_band_is_no_cross() {
        // prev has not re-entered the band yet.
        let result = read(&[130.0, 120.0, 90.0]);
        assert!(!result.crossed);
    }
}
