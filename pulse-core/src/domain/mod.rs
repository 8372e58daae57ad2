//! Domain types: candles, signals, analysis results.

pub mod analysis;
pub mod candle;
pub mod signal;

pub use analysis::AnalysisResult;
pub use candle::{Candle, CandleColor};
pub use signal::{OscillatorSignal, Signal, Trend};
