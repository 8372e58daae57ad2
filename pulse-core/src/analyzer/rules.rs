//! Rule-engine analyzer: candle window in, deterministic signal out.

use super::{AnalyzeError, MarketAnalyzer};
use crate::domain::AnalysisResult;
use crate::engine::{self, EngineConfig};
use crate::source::{validate_window, CandleSource};

/// Trailing candles needed to exercise every rule: 5 for the trend vote,
/// 5 for pivot extrema, 3 oscillator values past the averaging period.
pub const DEFAULT_WINDOW: usize = 20;

/// Deterministic analyzer: pulls a trailing window from its feed and runs
/// the rule pipeline over it.
pub struct RuleAnalyzer {
    source: Box<dyn CandleSource>,
    config: EngineConfig,
    window_len: usize,
}

impl RuleAnalyzer {
    pub fn new(source: Box<dyn CandleSource>, config: EngineConfig) -> Self {
        Self {
            source,
            config,
            window_len: DEFAULT_WINDOW,
        }
    }

    pub fn with_window_len(mut self, window_len: usize) -> Self {
        self.window_len = window_len;
        self
    }
}

impl MarketAnalyzer for RuleAnalyzer {
    fn name(&self) -> &str {
        "rule_engine"
    }

    fn analyze(&mut self) -> Result<AnalysisResult, AnalyzeError> {
        let candles = self.source.window(self.window_len)?;
        validate_window(&candles)?;
        Ok(engine::analyze(&candles, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use crate::source::{FeedError, SyntheticFeed};

    #[test]
    fn analyzes_synthetic_window() {
        let feed = SyntheticFeed::new(7, 1.0850, 1_700_000_000_000);
        let mut analyzer = RuleAnalyzer::new(Box::new(feed), EngineConfig::default());
        let result = analyzer.analyze().unwrap();
        assert!((0.0..=100.0).contains(&result.confidence));
        assert!(!result.reasons.is_empty());
        assert_eq!(analyzer.name(), "rule_engine");
    }

    #[test]
    fn feed_failure_propagates() {
        struct DeadFeed;
        impl CandleSource for DeadFeed {
            fn name(&self) -> &str {
                "dead"
            }
            fn window(&mut self, _len: usize) -> Result<Vec<Candle>, FeedError> {
                Err(FeedError::Unavailable("disconnected".into()))
            }
        }

        let mut analyzer = RuleAnalyzer::new(Box::new(DeadFeed), EngineConfig::default());
        assert!(matches!(
            analyzer.analyze(),
            Err(AnalyzeError::Feed(FeedError::Unavailable(_)))
        ));
    }

    #[test]
    fn rejects_contract_violating_feed() {
        struct StaleFeed;
        impl CandleSource for StaleFeed {
            fn name(&self) -> &str {
                "stale"
            }
            fn window(&mut self, len: usize) -> Result<Vec<Candle>, FeedError> {
                // Every candle carries the same timestamp.
                Ok((0..len)
                    .map(|_| Candle {
                        open: 1.0850,
                        high: 1.0855,
                        low: 1.0845,
                        close: 1.0852,
                        timestamp: 1_700_000_000_000,
                    })
                    .collect())
            }
        }

        let mut analyzer = RuleAnalyzer::new(Box::new(StaleFeed), EngineConfig::default());
        assert!(matches!(
            analyzer.analyze(),
            Err(AnalyzeError::Feed(FeedError::OutOfOrder { .. }))
        ));
    }
}
