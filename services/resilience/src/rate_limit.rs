//! Sliding-window rate limiter.
//!
//! Grounded on the source workspace's gateway `rate_limit` middleware
//! (`Mutex<HashMap<ClientId, ...>>`, retain-then-check), but keyed on the
//! caller's resolved `actor_id` rather than an `X-Forwarded-For` header the
//! source workspace itself flagged as attacker-spoofable.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::error::{ErrorKind, KernelError};
use std::collections::{HashMap, VecDeque};

pub struct RateLimiter {
    requests: Mutex<HashMap<String, VecDeque<DateTime<Utc>>>>,
    window_ms: i64,
    max_requests: usize,
}

impl RateLimiter {
    pub fn new(window_ms: i64, max_requests: usize) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            window_ms,
            max_requests,
        }
    }

    /// Evicts timestamps older than `now - window`, then admits iff the
    /// retained count is below `max_requests`.
    pub fn check(&self, actor_id: &str, now: DateTime<Utc>) -> Result<(), KernelError> {
        let mut requests = self.requests.lock();
        let timestamps = requests.entry(actor_id.to_string()).or_default();

        while let Some(oldest) = timestamps.front() {
            if (now - *oldest).num_milliseconds() >= self.window_ms {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.max_requests {
            return Err(KernelError::new(ErrorKind::RateLimited, "rate limit exceeded")
                .with_retry_after(self.window_ms as u64));
        }

        timestamps.push_back(now);
        Ok(())
    }
}
