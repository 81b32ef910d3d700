//! Circuit breaker.
//!
//! Grounded directly on the source workspace's own documented fix for its
//! split-lock breaker bug (`risk::limits::CircuitBreaker` kept failure
//! count, success count, state and last-failure timestamp behind four
//! separate locks/atomics, so a reader could observe a new discriminant
//! paired with a stale counter). This version holds all four fields behind
//! one `RwLock<BreakerInner>`.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

struct BreakerInner {
    state: BreakerState,
    failures: u32,
    successes: u32,
    last_failure_at: Option<DateTime<Utc>>,
}

pub struct CircuitBreaker {
    inner: RwLock<BreakerInner>,
    threshold: u32,
    recovery_ms: i64,
}

impl CircuitBreaker {
    pub fn new(threshold: u32, recovery_ms: i64) -> Self {
        Self {
            inner: RwLock::new(BreakerInner {
                state: BreakerState::Closed,
                failures: 0,
                successes: 0,
                last_failure_at: None,
            }),
            threshold,
            recovery_ms,
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.write();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.successes += 1;
                if inner.successes >= 3 {
                    inner.state = BreakerState::Closed;
                    inner.failures = 0;
                    inner.successes = 0;
                }
            }
            BreakerState::Closed => {
                inner.failures = inner.failures.saturating_sub(1);
            }
            BreakerState::Open => {}
        }
    }

    pub fn record_failure(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.write();
        match inner.state {
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                inner.last_failure_at = Some(now);
            }
            BreakerState::Closed => {
                inner.failures += 1;
                if inner.failures >= self.threshold {
                    inner.state = BreakerState::Open;
                }
                inner.last_failure_at = Some(now);
            }
            BreakerState::Open => {
                inner.last_failure_at = Some(now);
            }
        }
    }

    /// Evaluates the time-based `open -> half_open` transition against
    /// `now`, then reports whether a request would be allowed.
    pub fn is_allowed(&self, now: DateTime<Utc>) -> bool {
        let mut inner = self.inner.write();
        if inner.state == BreakerState::Open {
            if let Some(last_failure) = inner.last_failure_at {
                if (now - last_failure).num_milliseconds() >= self.recovery_ms {
                    inner.state = BreakerState::HalfOpen;
                    inner.successes = 0;
                }
            }
        }
        inner.state != BreakerState::Open
    }

    pub fn snapshot(&self) -> (BreakerState, u32, u32) {
        let inner = self.inner.read();
        (inner.state, inner.failures, inner.successes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(3, 1000);
        let now = Utc::now();
        breaker.record_failure(now);
        breaker.record_failure(now);
        breaker.record_failure(now);
        let (state, failures, _) = breaker.snapshot();
        assert_eq!(state, BreakerState::Open);
        assert_eq!(failures, 3);
    }

    #[test]
    fn success_decrements_failures_while_closed() {
        let breaker = CircuitBreaker::new(5, 1000);
        let now = Utc::now();
        breaker.record_failure(now);
        breaker.record_failure(now);
        breaker.record_success();
        let (state, failures, _) = breaker.snapshot();
        assert_eq!(state, BreakerState::Closed);
        assert_eq!(failures, 1);
    }

    #[test]
    fn half_opens_after_recovery_window_elapses() {
        let breaker = CircuitBreaker::new(1, 1000);
        let t0 = Utc::now();
        breaker.record_failure(t0);
        assert!(!breaker.is_allowed(t0));
        let later = t0 + Duration::milliseconds(1001);
        assert!(breaker.is_allowed(later));
        assert_eq!(breaker.snapshot().0, BreakerState::HalfOpen);
    }

    #[test]
    fn half_open_closes_after_three_successes() {
        let breaker = CircuitBreaker::new(1, 0);
        let t0 = Utc::now();
        breaker.record_failure(t0);
        breaker.is_allowed(t0);
        breaker.record_success();
        breaker.record_success();
        assert_eq!(breaker.snapshot().0, BreakerState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.snapshot().0, BreakerState::Closed);
    }

    #[test]
    fn half_open_failure_reopens_immediately() {
        let breaker = CircuitBreaker::new(1, 0);
        let t0 = Utc::now();
        breaker.record_failure(t0);
        breaker.is_allowed(t0);
        breaker.record_failure(t0);
        assert_eq!(breaker.snapshot().0, BreakerState::Open);
    }

    #[test]
    fn is_allowed_true_in_closed_and_half_open_false_in_open() {
        let breaker = CircuitBreaker::new(1, 1000);
        let t0 = Utc::now();
        assert!(breaker.is_allowed(t0));
        breaker.record_failure(t0);
        assert!(!breaker.is_allowed(t0));
    }
}
