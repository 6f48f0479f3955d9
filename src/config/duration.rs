//! Duration parsing utilities.

use anyhow::Context;
use std::time::Duration;

/// Parse a duration string into a [`Duration`].
/// Supports:
/// - Clock syntax `[[HH:]MM:]SS`: "00:00:01", "01:30", "2:00:00"
/// - Plain numbers (interpreted as seconds, fractions allowed): "300", "0.25"
/// - Milliseconds suffix: "250ms"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
/// - Days suffix: "1d"
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        anyhow::bail!("Empty duration string");
    }

    if s.contains(':') {
        return parse_clock(s);
    }

    // "ms" has to be checked before "m" and "s"
    if let Some(num_str) = s.strip_suffix("ms") {
        let millis: f64 = num_str
            .trim()
            .parse()
            .with_context(|| format!("Invalid milliseconds value: {num_str}"))?;
        return seconds(millis / 1000.0)
            .with_context(|| format!("Invalid milliseconds value: {num_str}"));
    }
    if let Some(num_str) = s.strip_suffix('d') {
        return scaled(num_str, 86_400.0, "days");
    }
    if let Some(num_str) = s.strip_suffix('h') {
        return scaled(num_str, 3600.0, "hours");
    }
    if let Some(num_str) = s.strip_suffix('m') {
        return scaled(num_str, 60.0, "minutes");
    }
    if let Some(num_str) = s.strip_suffix('s') {
        return scaled(num_str, 1.0, "seconds");
    }

    // No suffix - treat as seconds
    scaled(s, 1.0, "duration")
}

fn scaled(num_str: &str, unit_secs: f64, unit: &str) -> anyhow::Result<Duration> {
    let value: f64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid {unit} value: {num_str}"))?;
    seconds(value * unit_secs).with_context(|| format!("Invalid {unit} value: {num_str}"))
}

fn seconds(value: f64) -> anyhow::Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("Duration must be a non-negative number of seconds, got {value}");
    }
    Duration::try_from_secs_f64(value).context("Duration is out of range")
}

/// `[[HH:]MM:]SS`, where SS may carry a fraction.
fn parse_clock(s: &str) -> anyhow::Result<Duration> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() > 3 {
        anyhow::bail!("Invalid clock duration (expected [[HH:]MM:]SS): {s}");
    }

    let (leading, last) = parts.split_at(parts.len() - 1);
    let secs: f64 = last[0]
        .parse()
        .with_context(|| format!("Invalid seconds value in {s}: {}", last[0]))?;
    if !(0.0..60.0).contains(&secs) {
        anyhow::bail!("Seconds must be in [0, 60) in clock duration: {s}");
    }

    let mut total = 0u64;
    for (i, part) in leading.iter().enumerate() {
        let value: u64 = part
            .parse()
            .with_context(|| format!("Invalid clock component in {s}: {part}"))?;
        // Minutes are the last leading component and must stay below an hour
        // when hours are given.
        if leading.len() == 2 && i == 1 && value >= 60 {
            anyhow::bail!("Minutes must be below 60 in clock duration: {s}");
        }
        total = total
            .checked_mul(60)
            .and_then(|t| t.checked_add(value))
            .with_context(|| format!("Clock duration is out of range: {s}"))?;
    }

    let whole = Duration::from_secs(
        total
            .checked_mul(60)
            .with_context(|| format!("Clock duration is out of range: {s}"))?,
    );
    Ok(whole + seconds(secs)?)
}
