//! Minute-candle clock helpers.
//!
//! The advisory loop fires once per candle: these helpers sync ticks to
//! wall-clock minute boundaries and key the dedup gate.

use chrono::{DateTime, TimeZone, Timelike};

/// Wall-clock minute of the hour (0–59) — the dedup gate's key.
pub fn minute_of_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    now.minute()
}

/// Seconds remaining until the next minute boundary (1–60).
pub fn seconds_until_next_minute<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    60 - now.second()
}

/// Local wall-clock label for display records, HH:MM:SS.
pub fn clock_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M:%S").to_string()
}
