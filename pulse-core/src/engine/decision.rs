//! Confidence aggregation and the final BUY/SELL/WAIT decision.
//!
//! Each rule contributes independently to the confidence score and appends a
//! human-readable reason or alert. The entry gate then requires every
//! condition to hold at once: enough confidence, a directional trend, a
//! confirming candle, and no support/resistance level blocking the path.
//! Any failure degrades to WAIT with the failing conditions listed in a
//! fixed order after the summary headline.

use crate::domain::{AnalysisResult, Candle, CandleColor, OscillatorSignal, Signal, Trend};

use super::levels::Levels;
use super::{oscillator, streak, trend, EngineConfig};

const TREND_BONUS: f64 = 20.0;
const CONFIRMATION_BONUS: f64 = 25.0;
const LEVEL_PENALTY: f64 = 20.0;
const OSCILLATOR_BONUS: f64 = 30.0;
const EXHAUSTION_PENALTY: f64 = 15.0;

/// Trend strength above which the trend rule pays its bonus.
const STRONG_TREND: f64 = 0.6;

/// Run length at which a streak reads as exhaustion rather than momentum.
const EXHAUSTION_RUN: usize = 4;

/// Run the full rule pipeline over a trailing candle window.
///
/// Pure and synchronous: identical windows produce identical decisions.
/// Degenerate windows never error — each sub-rule that lacks enough candles
/// contributes nothing, and the entry gate turns the shortfall into WAIT.
pub fn analyze(candles: &[Candle], config: &EngineConfig) -> AnalysisResult {
    let mut reasons: Vec<String> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();
    let mut confidence = 0.0_f64;

    let current_price = candles.last().map(|c| c.close).unwrap_or(f64::NAN);

    // 1. Trend
    let (trend, strength) = trend::detect(candles, config.trend_window);
    if strength > STRONG_TREND {
        confidence += TREND_BONUS;
        reasons.push(format!("strong {trend} trend ({:.0}%)", strength * 100.0));
    }

    // 2. Candle confirmation
    let (run, last_color) = streak::count_run(candles);
    let has_confirmation = matches!(
        (trend, last_color),
        (Trend::Up, CandleColor::Green) | (Trend::Down, CandleColor::Red)
    );
    if has_confirmation && run >= 1 {
        confidence += CONFIRMATION_BONUS;
        reasons.push(format!("confirmation candle: {run}x {last_color}"));
    } else if !has_confirmation && trend.is_directional() {
        alerts.push(format!("no confirmation: last candle {last_color} against trend"));
    }

    // 3. Support/resistance proximity
    let levels = Levels::find(candles, config.pivot_wings);
    let near_resistance = levels.near_resistance(current_price, config.level_threshold);
    let near_support = levels.near_support(current_price, config.level_threshold);
    if near_resistance && trend == Trend::Up {
        confidence -= LEVEL_PENALTY;
        alerts.push("resistance zone nearby, pullback risk".into());
    }
    if near_support && trend == Trend::Down {
        confidence -= LEVEL_PENALTY;
        alerts.push("support zone nearby, pullback risk".into());
    }
    let blocking_level =
        (near_resistance && trend == Trend::Up) || (near_support && trend == Trend::Down);

    // 4. Oscillator continuation
    let series = oscillator::index_series(candles, config.oscillator_period);
    let osc = oscillator::read(&series);
    let mut oscillator_signal = OscillatorSignal::Neutral;
    if osc.returned {
        let agrees =
            (trend == Trend::Up && osc.last > 0.0) || (trend == Trend::Down && osc.last < 0.0);
        if agrees {
            confidence += OSCILLATOR_BONUS;
            oscillator_signal = OscillatorSignal::Confirmed;
            reasons.push(format!("oscillator confirmed continuation: {:.1}", osc.last));
        } else {
            oscillator_signal = OscillatorSignal::Rejected;
            alerts.push(format!("oscillator divergent: {:.1}", osc.last));
        }
    }

    // 5. Exhaustion
    if run >= EXHAUSTION_RUN {
        confidence -= EXHAUSTION_PENALTY;
        alerts.push(format!("{run} consecutive candles, possible exhaustion"));
    }

    let confidence = confidence.clamp(0.0, 100.0);

    // 6. Entry gate
    let can_trade =
        confidence >= config.min_confidence && has_confirmation && trend.is_directional();

    let signal = if can_trade && !blocking_level {
        if trend == Trend::Up {
            Signal::Buy
        } else {
            Signal::Sell
        }
    } else {
        Signal::Wait
    };

    match signal {
        Signal::Buy => reasons.insert(0, "ENTER LONG: trend confirmed".into()),
        Signal::Sell => reasons.insert(0, "ENTER SHORT: trend confirmed".into()),
        Signal::Wait => {
            reasons.insert(0, "WAITING: entry conditions not met".into());
            if !has_confirmation {
                reasons.push("missing confirmation candle".into());
            }
            if blocking_level {
                reasons.push("support/resistance level blocking".into());
            }
            if confidence < config.min_confidence {
                reasons.push(format!("low confidence: {confidence:.0}%"));
            }
        }
    }

    AnalysisResult {
        signal,
        confidence,
        reasons,
        alerts,
        trend,
        oscillator: oscillator_signal,
    }
}
