//! Support/resistance location — local pivot extrema and proximity checks.

use crate::domain::Candle;

/// Local price extrema found in a candle window.
///
/// A bar is a resistance point when its high strictly exceeds the highs of
/// the `wings` bars on each side; supports use the symmetric strict rule on
/// lows. Windows shorter than `2 * wings + 1` (5 at the default) yield no
/// levels, which downstream reads as "nothing nearby".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels {
    pub supports: Vec<f64>,
    pub resistances: Vec<f64>,
}

impl Levels {
    pub fn find(candles: &[Candle], wings: usize) -> Self {
        let mut levels = Self::default();
        if wings == 0 || candles.len() < 2 * wings + 1 {
            return levels;
        }

        for i in wings..candles.len() - wings {
            let high = candles[i].high;
            let low = candles[i].low;

            let is_resistance =
                (1..=wings).all(|k| high > candles[i - k].high && high > candles[i + k].high);
            let is_support =
                (1..=wings).all(|k| low < candles[i - k].low && low < candles[i + k].low);

            if is_resistance {
                levels.resistances.push(high);
            }
            if is_support {
                levels.supports.push(low);
            }
        }

        levels
    }

    /// Whether `price` is within `threshold` of any resistance level.
    pub fn near_resistance(&self, price: f64, threshold: f64) -> bool {
        near(price, &self.resistances, threshold)
    }

    /// Whether `price` is within `threshold` of any support level.
    pub fn near_support(&self, price: f64, threshold: f64) -> bool {
        near(price, &self.supports, threshold)
    }
}

fn near(price: f64, levels: &[f64], threshold: f64) -> bool {
    levels.iter().any(|level| (price - level).abs() < threshold)
}
