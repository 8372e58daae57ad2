//! Consecutive same-color candle run.

use crate::domain::{Candle, CandleColor};

/// Count the run of candles sharing the most recent candle's color,
/// walking backward from the end and stopping at the first break.
///
/// Used twice by the decision pipeline: a run of at least one candle agreeing
/// with the trend is confirmation; a run of four or more flags exhaustion.
pub fn count_run(candles: &[Candle]) -> (usize, CandleColor) {
    let Some(last) = candles.last() else {
        return (0, CandleColor::Doji);
    };

    let color = last.color();
    let mut count = 1;
    for candle in candles[..candles.len() - 1].iter().rev() {
        if candle.color() == color {
            count += 1;
        } else {
            break;
        }
    }

    (count, color)
}
