//! Vision-model analyzer — external chart-reading signal source.
//!
//! Posts a captured chart frame to a generative-vision endpoint and parses
//! the model's structured plain-text reply into an `AnalysisResult`. The
//! image understanding itself is entirely external: this module is
//! transport, key rotation, and reply parsing. On HTTP 429 the analyzer
//! rotates to the next configured API key; every retry round backs off
//! exponentially, up to `max_retries × key_count` total attempts.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::warn;

use super::{AnalyzeError, MarketAnalyzer};
use crate::domain::{AnalysisResult, OscillatorSignal, Signal, Trend};

/// Instruction sent with every frame. The reply format below is what
/// `parse_reply` understands.
const ANALYSIS_PROMPT: &str = "\
You are a one-minute chart analyst looking for high-probability setups.
Required filters:
- Context: prior wick zones and support/resistance.
- Current candle: a small resting candle without long counter-trend wicks \
confirms continuation.
- Reversal: a body stalling in an opposing wick zone predicts reversal.
- If the market is ranging or unclear, answer WAIT.

Reply EXACTLY in this format:
SIGNAL: [BUY / SELL / WAIT]
ASSET: [asset visible on the chart]
TIMEFRAME: [M1, M5, ...]
CONFIDENCE: [High / Medium / Low]
REASON: [short technical rationale]";

/// Errors surfaced by the vision path.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("no API keys configured")]
    NoKeys,

    #[error("frame capture failed: {0}")]
    Capture(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("empty reply from model")]
    EmptyReply,

    #[error("all {attempts} attempts exhausted")]
    Exhausted { attempts: u32 },
}

/// Supplier of the current chart frame as base64-encoded JPEG bytes.
///
/// Screen-capture plumbing lives outside the core; tests and headless
/// deployments plug in their own implementation.
pub trait FrameSource: Send {
    fn frame(&mut self) -> Result<String, VisionError>;
}

/// Vision endpoint configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Keys tried in rotation; rotated on HTTP 429 and transport errors.
    pub api_keys: Vec<String>,
    /// Endpoint URL; the active key is appended as a query parameter.
    pub endpoint: String,
    /// Per-key retry budget: total attempts = `max_retries × key count`.
    pub max_retries: u32,
    /// Base backoff delay, doubled each retry round.
    pub base_delay_ms: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent".into(),
            max_retries: 3,
            base_delay_ms: 1_000,
        }
    }
}

/// Analyzer backed by an external vision model.
pub struct VisionAnalyzer {
    client: reqwest::blocking::Client,
    config: VisionConfig,
    frames: Box<dyn FrameSource>,
    key_index: usize,
}

impl VisionAnalyzer {
    pub fn new(config: VisionConfig, frames: Box<dyn FrameSource>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            config,
            frames,
            key_index: 0,
        }
    }

    /// Total attempts before giving up.
    fn attempt_budget(&self) -> u32 {
        self.config.max_retries * self.config.api_keys.len() as u32
    }

    /// Advance to the next key. Returns false when there is nothing to
    /// rotate to — backoff is then the only recourse.
    fn rotate_key(&mut self) -> bool {
        if self.config.api_keys.len() <= 1 {
            return false;
        }
        self.key_index = (self.key_index + 1) % self.config.api_keys.len();
        true
    }

    fn request(
        &self,
        key: &str,
        frame_b64: &str,
    ) -> Result<reqwest::blocking::Response, VisionError> {
        let url = format!("{}?key={key}", self.config.endpoint);
        let body = json!({
            "contents": [{
                "parts": [
                    { "text": format!("{ANALYSIS_PROMPT}\n\nAnalyze this chart image:") },
                    { "inline_data": { "mime_type": "image/jpeg", "data": frame_b64 } },
                ]
            }],
            "generationConfig": { "temperature": 0.3, "maxOutputTokens": 500 }
        });

        self.client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| VisionError::Transport(e.to_string()))
    }

    /// Execute the request with key rotation and exponential backoff.
    fn fetch_reply(&mut self, frame_b64: &str) -> Result<String, VisionError> {
        if self.config.api_keys.is_empty() {
            return Err(VisionError::NoKeys);
        }

        let budget = self.attempt_budget();
        let mut last_error = None;

        for attempt in 0..budget {
            if attempt > 0 {
                let delay = self.config.base_delay_ms * 2u64.pow((attempt - 1).min(6));
                std::thread::sleep(Duration::from_millis(delay));
            }

            let key = self.config.api_keys[self.key_index].clone();
            match self.request(&key, frame_b64) {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        warn!(attempt, "vision endpoint rate limited, rotating key");
                        self.rotate_key();
                        last_error = Some(VisionError::Status {
                            status: 429,
                            message: "rate limited".into(),
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(VisionError::Status {
                            status: status.as_u16(),
                            message: resp.text().unwrap_or_default(),
                        });
                        self.rotate_key();
                        continue;
                    }

                    let payload: serde_json::Value = resp
                        .json()
                        .map_err(|e| VisionError::Transport(e.to_string()))?;
                    let text = payload["candidates"][0]["content"]["parts"][0]["text"]
                        .as_str()
                        .unwrap_or_default();
                    if text.is_empty() {
                        return Err(VisionError::EmptyReply);
                    }
                    return Ok(text.to_string());
                }
                Err(e) => {
                    warn!(attempt, error = %e, "vision request failed");
                    last_error = Some(e);
                    self.rotate_key();
                }
            }
        }

        Err(last_error.unwrap_or(VisionError::Exhausted { attempts: budget }))
    }

    /// Parse the model's structured plain-text reply.
    ///
    /// Unknown or missing fields degrade instead of erroring: the signal
    /// defaults to WAIT, and the last non-empty line stands in for a missing
    /// REASON. The reply carries no trend/oscillator data, so the trend is
    /// derived from the signal and the oscillator verdict stays neutral.
    fn parse_reply(text: &str) -> AnalysisResult {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut signal = Signal::Wait;
        let mut confidence = 0.0;
        let mut reason = String::new();
        let mut asset = String::new();
        let mut timeframe = String::new();

        for line in &lines {
            let upper = line.to_uppercase();
            if upper.starts_with("SIGNAL:") {
                signal = if upper.contains("BUY") {
                    Signal::Buy
                } else if upper.contains("SELL") {
                    Signal::Sell
                } else {
                    Signal::Wait
                };
            } else if upper.starts_with("ASSET:") {
                asset = field_value(line);
            } else if upper.starts_with("TIMEFRAME:") {
                timeframe = field_value(line);
            } else if upper.starts_with("CONFIDENCE:") {
                let level = field_value(line).to_uppercase();
                confidence = if level.contains("HIGH") {
                    90.0
                } else if level.contains("MEDIUM") {
                    70.0
                } else {
                    50.0
                };
            } else if upper.starts_with("REASON:") {
                reason = field_value(line);
            }
        }

        if reason.is_empty() {
            reason = lines
                .last()
                .map(|l| l.to_string())
                .unwrap_or_else(|| "analysis complete".into());
        }

        let trend = match signal {
            Signal::Buy => Trend::Up,
            Signal::Sell => Trend::Down,
            Signal::Wait => Trend::Sideways,
        };

        let mut reasons = vec![reason];
        if !asset.is_empty() {
            reasons.push(format!("asset: {asset}"));
        }
        if !timeframe.is_empty() {
            reasons.push(format!("timeframe: {timeframe}"));
        }

        AnalysisResult {
            signal,
            confidence,
            reasons,
            alerts: Vec::new(),
            trend,
            oscillator: OscillatorSignal::Neutral,
        }
    }
}

/// Everything after the first colon, trimmed.
fn field_value(line: &str) -> String {
    line.split_once(':')
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

impl MarketAnalyzer for VisionAnalyzer {
    fn name(&self) -> &str {
        "vision_model"
    }

    fn analyze(&mut self) -> Result<AnalysisResult, AnalyzeError> {
        let frame = self.frames.frame()?;
        let text = self.fetch_reply(&frame)?;
        Ok(Self::parse_reply(&text))
    }
}
