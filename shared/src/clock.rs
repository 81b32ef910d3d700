//! Monotone wall-time and a process-wide sequence generator.
//!
//! Every other component reads time and sequence numbers through here so
//! tests can swap in a `ManualClock` instead of sleeping on wall-clock time.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

/// A source of non-decreasing wall time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock tests can pin and advance, so breaker/checkpoint timing doesn't
/// depend on real sleeps.
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current = *current + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

/// A thread-safe, strictly increasing sequence generator.
///
/// `next_seq()` never returns the same value twice and never returns a
/// smaller value than a previous call, across any number of threads.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    counter: AtomicI64,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicI64::new(0),
        }
    }

    /// Starts the generator such that the first call to `next_seq` returns
    /// `starting_from + 1`.
    pub fn starting_at(starting_from: i64) -> Self {
        Self {
            counter: AtomicI64::new(starting_from),
        }
    }

    pub fn next_seq(&self) -> i64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> i64 {
        self.counter.load(Ordering::SeqCst)
    }
}
