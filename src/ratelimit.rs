//! Fixed-window rate limiting keyed by caller identifier

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default interval between sweeps of expired buckets
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Request counter for one identifier and window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bucket {
    /// Requests admitted in the current window
    count:    u32,
    /// End of the current window; `None` when it lies beyond `Instant`'s range
    reset_at: Option<Instant>,
}

impl Bucket {
    fn is_expired(&self, now: Instant) -> bool {
        self.reset_at.is_some_and(|reset_at| now > reset_at)
    }
}

/// Fixed-window counter per identifier.
///
/// A window opens on the first request after the previous one ended, so up to
/// twice the limit can pass in a short span around a window boundary.
/// Expired buckets are swept at most once per sweep interval.
#[derive(Debug)]
pub struct RateLimiter {
    /// Live and not yet swept buckets
    buckets:        HashMap<String, Bucket>,
    /// Minimum time between sweeps
    sweep_interval: Duration,
    /// Instant of the last sweep, or of the first check before any sweep
    last_sweep:     Option<Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// Create a limiter that sweeps every `DEFAULT_SWEEP_INTERVAL`
    #[must_use]
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Create a limiter with a custom sweep interval
    #[must_use]
    pub fn with_sweep_interval(sweep_interval: Duration) -> Self {
        Self { buckets: HashMap::new(), sweep_interval, last_sweep: None }
    }

    /// Number of tracked identifiers, expired ones included until swept
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no identifiers are tracked
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Admit or deny a request for `identifier` now
    pub fn check(&mut self, identifier: &str, max_requests: u32, window: Duration) -> bool {
        self.check_at(identifier, max_requests, window, Instant::now())
    }

    /// Admit or deny a request for `identifier` at `now`
    pub fn check_at(
        &mut self,
        identifier: &str,
        max_requests: u32,
        window: Duration,
        now: Instant,
    ) -> bool {
        self.maybe_sweep(now);

        if let Some(bucket) = self.buckets.get_mut(identifier).filter(|b| !b.is_expired(now)) {
            if bucket.count >= max_requests {
                tracing::debug!(identifier, count = bucket.count, "rate limit exceeded");
                return false;
            }
            bucket.count += 1;
            return true;
        }

        let reset_at = now.checked_add(window);
        self.buckets.insert(identifier.to_owned(), Bucket { count: 1, reset_at });
        true
    }

    /// Drop every bucket whose window ended before `now`
    pub fn sweep(&mut self, now: Instant) {
        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| !bucket.is_expired(now));
        let removed = before - self.buckets.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.buckets.len(), "swept rate limit buckets");
        }
    }

    fn maybe_sweep(&mut self, now: Instant) {
        match self.last_sweep {
            Some(last) if now.saturating_duration_since(last) < self.sweep_interval => {},
            Some(_) => {
                self.sweep(now);
                self.last_sweep = Some(now);
            },
            None => self.last_sweep = Some(now),
        }
    }
}
