//! Shared rate limiting for WHOIS queries.
//!
//! Registries throttle aggressively, so the minimum interval between WHOIS
//! queries is a single global budget shared by every worker, not a per-worker
//! delay. DNS prechecks are never gated.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::time::Duration;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Minimum-interval gate applied before every WHOIS query.
///
/// Constructed once per run and shared (via `Arc`) across all workers.
/// Tests inject `unthrottled()` for deterministic, zero-delay behavior.
pub struct WhoisRateLimiter {
    limiter: Option<Limiter>,
}

impl WhoisRateLimiter {
    /// Gate queries to at most one per `interval`.
    ///
    /// A zero interval produces an unthrottled limiter.
    pub fn with_min_interval(interval: Duration) -> Self {
        match Quota::with_period(interval) {
            Some(quota) => Self {
                limiter: Some(RateLimiter::direct(quota)),
            },
            None => Self::unthrottled(),
        }
    }

    /// A limiter that never delays.
    pub fn unthrottled() -> Self {
        Self { limiter: None }
    }

    /// Wait until the next query is allowed.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
