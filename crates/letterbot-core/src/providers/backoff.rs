//! Retry-After parsing and full-jitter backoff

use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

/// Parse a Retry-After header value: plain non-negative seconds, or an HTTP
/// date converted to a relative delay (never negative).
///
/// Values a Duration cannot represent (negative, non-finite, or absurdly
/// large) are treated as absent; the caller falls back to jittered backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let raw = value.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(secs) = raw.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).ok();
    }

    let when = DateTime::parse_from_rfc2822(raw).ok()?;
    let delta = when.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

/// Uniformly random wait in `[0, min(cap, 2^attempt seconds)]`.
///
/// Attempt count starts at 1; the randomness avoids synchronized retry
/// storms across concurrent generation requests.
pub fn full_jitter(attempt: u32, cap: Duration) -> Duration {
    let exp = 2f64.powi(attempt.min(32) as i32);
    let ceiling = cap.as_secs_f64().min(exp);
    if ceiling <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..=ceiling))
}

/// Wait before the next attempt: an explicit Retry-After is honored capped
/// at `cap`, otherwise full-jitter backoff.
pub fn retry_wait(retry_after: Option<Duration>, attempt: u32, cap: Duration) -> Duration {
    match retry_after {
        Some(d) => d.min(cap),
        None => full_jitter(attempt, cap),
    }
}
