//! Pulse Core — minute-candle signal engine, dedup gate, analyzer seams.
//!
//! This crate contains the decision-making heart of the advisory tool:
//! - Domain types (candles, signals, analysis results)
//! - Deterministic rule pipeline (trend, confirmation, levels, oscillator)
//! - Per-minute signal dedup gate
//! - Candle source contract with a synthetic stand-in feed
//! - Pluggable market analyzers (rule engine, external vision model)

pub mod analyzer;
pub mod domain;
pub mod engine;
pub mod gate;
pub mod source;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything that crosses the session boundary is
    /// Send, and the plain value types are Sync as well. Breaks the build
    /// immediately if a non-Send field sneaks into these types.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::CandleColor>();
        require_sync::<domain::CandleColor>();
        require_send::<domain::Signal>();
        require_sync::<domain::Signal>();
        require_send::<domain::Trend>();
        require_sync::<domain::Trend>();
        require_send::<domain::OscillatorSignal>();
        require_sync::<domain::OscillatorSignal>();
        require_send::<domain::AnalysisResult>();
        require_sync::<domain::AnalysisResult>();

        // Engine
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::Levels>();
        require_sync::<engine::Levels>();
        require_send::<engine::OscillatorRead>();
        require_sync::<engine::OscillatorRead>();

        // Gate
        require_send::<gate::SignalGate>();
        require_sync::<gate::SignalGate>();

        // Collaborators (hold Box<dyn ... + Send>, so Send only)
        require_send::<source::SyntheticFeed>();
        require_send::<analyzer::RuleAnalyzer>();
        require_send::<analyzer::VisionAnalyzer>();
    }

    /// Architecture contract: the engine entry point is a pure function of
    /// its window and config — no clock, no gate state, no I/O. If this
    /// signature ever grows a stateful parameter, this test documents the
    /// contract being broken.
    #[test]
    fn engine_entry_point_is_pure() {
        fn _check(
            candles: &[domain::Candle],
            config: &engine::EngineConfig,
        ) -> domain::AnalysisResult {
            engine::analyze(candles, config)
        }
    }
}
