//! Analysis result — the value object one engine pass produces.

use serde::{Deserialize, Serialize};

use super::{OscillatorSignal, Signal, Trend};

/// Result of one analysis pass over a candle window.
///
/// Computed fresh on every invocation; nothing here is mutated or carries
/// identity across ticks. `reasons[0]` is always the headline (entry
/// rationale or the WAIT summary); subsequent entries are supporting detail
/// in rule-fire order. `alerts` preserves rule-evaluation order
/// independently of `reasons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub signal: Signal,
    /// Aggregate rule score, clamped to [0, 100].
    pub confidence: f64,
    pub reasons: Vec<String>,
    pub alerts: Vec<String>,
    pub trend: Trend,
    pub oscillator: OscillatorSignal,
}

impl AnalysisResult {
    /// The headline reason, or an empty string for a degenerate result.
    pub fn headline(&self) -> &str {
        self.reasons.first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            signal: Signal::Buy,
            confidence: 65.0,
            reasons: vec!["entry rationale".into(), "detail".into()],
            alerts: vec![],
            trend: Trend::Up,
            oscillator: OscillatorSignal::Confirmed,
        }
    }

    #[test]
    fn headline_is_first_reason() {
        assert_eq!(sample_result().headline(), "entry rationale");
    }

    #[test]
    fn headline_empty_without_reasons() {
        let mut result = sample_result();
        result.reasons.clear();
        assert_eq!(result.headline(), "");
    }

    #[test]
    fn result_serialization_roundtrip() {
        let result = sample_result();
        let json = serde_json::to_string(&result).unwrap();
        let deser: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deser);
    }
}
