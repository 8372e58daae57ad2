//! Serializable session configuration and analyzer construction.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pulse_core::analyzer::{FrameSource, MarketAnalyzer, RuleAnalyzer, VisionAnalyzer, VisionConfig};
use pulse_core::engine::EngineConfig;
use pulse_core::source::SyntheticFeed;

/// Structured errors for config loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Session configuration, loaded from TOML. Every field has a default so a
/// missing file section falls back to the built-in setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Asset label attached to emitted signal records.
    pub asset: String,
    /// Trailing window length requested from the candle source.
    pub window_len: usize,
    /// Signal history capacity.
    pub history_capacity: usize,
    /// Rule pipeline thresholds.
    pub engine: EngineConfig,
    /// Which analyzer produces signals.
    pub analyzer: AnalyzerConfig,
    /// Synthetic feed settings (rules analyzer only).
    pub feed: FeedConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset: "EUR/USD".into(),
            window_len: 20,
            history_capacity: 50,
            engine: EngineConfig::default(),
            analyzer: AnalyzerConfig::Rules,
            feed: FeedConfig::default(),
        }
    }
}

/// Analyzer selection (serializable tagged enum).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyzerConfig {
    /// Deterministic rule engine over the candle feed.
    Rules,
    /// External vision model over captured chart frames.
    Vision(VisionConfig),
}

/// Synthetic feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub seed: u64,
    pub start_price: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start_price: 1.0850,
        }
    }
}

impl SessionConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.window_len == 0 {
            return Err(ConfigError::Invalid("window_len must be >= 1".into()));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be >= 1".into()));
        }
        if self.engine.level_threshold <= 0.0 {
            return Err(ConfigError::Invalid(
                "engine.level_threshold must be > 0".into(),
            ));
        }
        if let AnalyzerConfig::Vision(vision) = &self.analyzer {
            if vision.api_keys.is_empty() {
                return Err(ConfigError::Invalid(
                    "vision analyzer requires at least one API key".into(),
                ));
            }
        }
        Ok(self)
    }
}

/// Build the configured analyzer.
///
/// The rules variant gets a synthetic feed whose first candle is stamped
/// `window_len` minutes before `now_ms`; a production deployment swaps the
/// feed, not the analyzer. The vision variant needs a frame source from the
/// capture layer.
pub fn build_analyzer(
    config: &SessionConfig,
    now_ms: i64,
    frames: Option<Box<dyn FrameSource>>,
) -> Result<Box<dyn MarketAnalyzer>, ConfigError> {
    match &config.analyzer {
        AnalyzerConfig::Rules => {
            let start = now_ms - config.window_len as i64 * 60_000;
            let feed = SyntheticFeed::new(config.feed.seed, config.feed.start_price, start);
            Ok(Box::new(
                RuleAnalyzer::new(Box::new(feed), config.engine.clone())
                    .with_window_len(config.window_len),
            ))
        }
        AnalyzerConfig::Vision(vision) => {
            let frames = frames.ok_or_else(|| {
                ConfigError::Invalid("vision analyzer requires a frame source".into())
            })?;
            Ok(Box::new(VisionAnalyzer::new(vision.clone(), frames)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default_setup() {
        let config = SessionConfig::from_toml("").unwrap();
        assert_eq!(config.asset, "EUR/USD");
        assert_eq!(config.window_len, 20);
        assert!(matches!(config.analyzer, AnalyzerConfig::Rules));
        assert_eq!(config.engine.level_threshold, 0.0005);
    }

    #[test]
    fn partial_toml_overrides() {
        let text = r#"
asset = "GBP/JPY"

[engine]
level_threshold = 0.05
min_confidence = 40.0

[feed]
seed = 7
"#;
        let config = SessionConfig::from_toml(text).unwrap();
        assert_eq!(config.asset, "GBP/JPY");
        assert_eq!(config.engine.level_threshold, 0.05);
        assert_eq!(config.engine.min_confidence, 40.0);
        assert_eq!(config.engine.trend_window, 5); // untouched default
        assert_eq!(config.feed.seed, 7);
    }

    #[test]
    fn vision_analyzer_from_toml() {
        let text = r#"
[analyzer]
type = "vision"
api_keys = ["k1", "k2"]
max_retries = 2
"#;
        let config = SessionConfig::from_toml(text).unwrap();
        match &config.analyzer {
            AnalyzerConfig::Vision(vision) => {
                assert_eq!(vision.api_keys.len(), 2);
                assert_eq!(vision.max_retries, 2);
                assert!(vision.endpoint.contains("generativelanguage"));
            }
            other => panic!("expected vision analyzer, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_window() {
        let err = SessionConfig::from_toml("window_len = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let err = SessionConfig::from_toml("[engine]\nlevel_threshold = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_vision_without_keys() {
        let text = "[analyzer]\ntype = \"vision\"";
        let err = SessionConfig::from_toml(text).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = SessionConfig::from_toml("window_len = \"twenty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "asset = \"BTC/USDT\"").unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.asset, "BTC/USDT");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::from_file(Path::new("/nonexistent/pulse.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn builds_rule_analyzer() {
        let config = SessionConfig::default();
        let analyzer = build_analyzer(&config, 1_700_000_000_000, None).unwrap();
        assert_eq!(analyzer.name(), "rule_engine");
    }

    #[test]
    fn vision_build_requires_frame_source() {
        let mut config = SessionConfig::default();
        config.analyzer = AnalyzerConfig::Vision(VisionConfig {
            api_keys: vec!["k".into()],
            ..VisionConfig::default()
        });
        let err = match build_analyzer(&config, 1_700_000_000_000, None) {
            Ok(_) => panic!("expected build_analyzer to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = SessionConfig::default();
        let text = toml::to_string(&config).unwrap();
        let deser = SessionConfig::from_toml(&text).unwrap();
        assert_eq!(deser.asset, config.asset);
        assert_eq!(deser.window_len, config.window_len);
    }
}
