//! Synthetic random-walk candle feed.
//!
//! Stand-in for a live market feed: each candle moves the price by a random
//! amount inside a narrow volatility band, with wicks extending up to half a
//! volatility unit beyond the body. Seeded so sessions and tests reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CandleSource, FeedError};
use crate::domain::Candle;

/// Per-candle volatility floor, in price units.
const BASE_VOLATILITY: f64 = 0.0003;

/// Random additional volatility on top of the floor.
const VOLATILITY_SPAN: f64 = 0.0005;

/// Milliseconds per one-minute candle.
const CANDLE_MS: i64 = 60_000;

/// Seeded random-walk feed.
///
/// The walk advances on every candle drawn; consecutive `window` calls
/// continue the same price path with timestamps one minute apart.
pub struct SyntheticFeed {
    rng: StdRng,
    price: f64,
    next_timestamp: i64,
}

impl SyntheticFeed {
    /// Feed starting at `price`, first candle stamped `start_timestamp`
    /// (epoch millis).
    pub fn new(seed: u64, price: f64, start_timestamp: i64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            price,
            next_timestamp: start_timestamp,
        }
    }

    fn next_candle(&mut self) -> Candle {
        let volatility = BASE_VOLATILITY + self.rng.gen::<f64>() * VOLATILITY_SPAN;
        let direction = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        let open = self.price;
        let close = open + volatility * direction;
        let high = open.max(close) + self.rng.gen::<f64>() * volatility * 0.5;
        let low = open.min(close) - self.rng.gen::<f64>() * volatility * 0.5;

        let timestamp = self.next_timestamp;
        self.next_timestamp += CANDLE_MS;
        self.price = close;

        Candle {
            open,
            high,
            low,
            close,
            timestamp,
        }
    }
}

impl CandleSource for SyntheticFeed {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn window(&mut self, len: usize) -> Result<Vec<Candle>, FeedError> {
        Ok((0..len).map(|_| self.next_candle()).collect())
    }
}
