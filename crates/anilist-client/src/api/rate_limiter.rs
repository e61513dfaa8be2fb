//! Client-side request pacing and server rate-limit bookkeeping.
//!
//! [`RateLimiter`] spaces requests out under per-second and per-minute
//! budgets. [`RateLimitState`] remembers the reset time the server reported
//! with its last 429, so callers can tell the user when to try again.

use chrono::{DateTime, Utc};
use shared::config::RateLimitConfig;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const MINUTE: Duration = Duration::from_secs(60);
/// Longest spacing a per-second budget can impose
const MAX_INTERVAL: Duration = Duration::from_secs(3600);
const MAX_INITIAL_CAPACITY: usize = 256;

/// Rate limiter with dual constraints (per-second and per-minute)
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    max_per_minute: usize,
    last_request: Option<Instant>,
    /// Request timestamps in the last minute, oldest first
    recent_requests: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_per_second: f64, max_per_minute: u32) -> Self {
        let min_interval = if max_per_second > 0.0 {
            Duration::try_from_secs_f64(1.0 / max_per_second)
                .map_or(MAX_INTERVAL, |interval| interval.min(MAX_INTERVAL))
        } else {
            Duration::ZERO
        };
        let max_per_minute = max_per_minute.max(1) as usize;

        Self {
            min_interval,
            max_per_minute,
            last_request: None,
            recent_requests: VecDeque::with_capacity(max_per_minute.min(MAX_INITIAL_CAPACITY)),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.requests_per_minute)
    }

    /// Wait until a request can be made, respecting both budgets
    pub async fn acquire(&mut self) {
        self.prune(Instant::now());

        if self.recent_requests.len() >= self.max_per_minute {
            if let Some(&oldest) = self.recent_requests.front() {
                let elapsed = oldest.elapsed();
                if elapsed < MINUTE {
                    let wait_time = MINUTE - elapsed;
                    tracing::debug!(
                        wait_ms = wait_time.as_millis(),
                        "Rate limit: waiting for per-minute budget"
                    );
                    sleep(wait_time).await;
                }
            }
            self.prune(Instant::now());
        }

        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait_time.as_millis(),
                    "Rate limit: waiting for per-second budget"
                );
                sleep(wait_time).await;
            }
        }

        let request_time = Instant::now();
        self.last_request = Some(request_time);
        self.recent_requests.push_back(request_time);
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.recent_requests.front() {
            if now.duration_since(oldest) >= MINUTE {
                self.recent_requests.pop_front();
            } else {
                break;
            }
        }
    }
}

/// Last rate-limit reset reported by the server
///
/// Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct RateLimitState {
    reset_at: Arc<AtomicI64>,
}

impl RateLimitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the epoch second from `X-RateLimit-Reset`
    pub fn record_reset(&self, reset_at: i64) {
        self.reset_at.store(reset_at, Ordering::Relaxed);
    }

    /// Last recorded reset, 0 when none was reported
    pub fn reset_at(&self) -> i64 {
        self.reset_at.load(Ordering::Relaxed)
    }

    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        match self.reset_at() {
            0 => None,
            secs => DateTime::from_timestamp(secs, 0),
        }
    }

    /// Seconds left until the reset, 0 once it has passed
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> i64 {
        match self.reset_at() {
            0 => 0,
            secs => (secs - now.timestamp()).max(0),
        }
    }
}

/// Parse an integer header value, `None` when absent or malformed
pub fn parse_header_i64(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}
