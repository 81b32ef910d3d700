//! Rolling-window scheduler shared with async producers.
//!
//! Grounded on the source workspace's own "correct implementation" note for
//! its queue's locking discipline: release the lock before returning, and
//! never hand out a reference into the internal buffer. `Flush` and
//! `PeekAll` both return owned `Vec`s the caller fully owns.

use crate::order::Order;
use parking_lot::Mutex;
use shared::error::{ErrorKind, KernelError};

pub struct RollingWindowScheduler {
    buffer: Mutex<Vec<Order>>,
}

impl RollingWindowScheduler {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn submit(&self, order: Order) {
        self.buffer.lock().push(order);
    }

    /// Atomic with respect to `flush`: either every order in `orders` is
    /// admitted, or (on overflow of the internal count) none are.
    pub fn submit_batch(&self, orders: Vec<Order>) -> Result<(), KernelError> {
        let mut buffer = self.buffer.lock();
        let new_len = buffer
            .len()
            .checked_add(orders.len())
            .ok_or_else(|| KernelError::new(ErrorKind::Internal, "scheduler buffer overflow"))?;
        buffer.reserve(new_len.saturating_sub(buffer.len()));
        buffer.extend(orders);
        Ok(())
    }

    /// Defensive copy; does not drain the buffer.
    pub fn peek_all(&self) -> Vec<Order> {
        self.buffer.lock().clone()
    }

    /// Drains and returns a stable, owned snapshot. Nothing submitted after
    /// this call can mutate the returned sequence.
    pub fn flush(&self) -> Vec<Order> {
        std::mem::take(&mut *self.buffer.lock())
    }

    /// `drain(0)` behaves like `flush` and takes every order; `drain(k)` for
    /// `k > 0` takes at most `k`, leaving the remainder in the buffer for a
    /// later call.
    pub fn drain(&self, k: usize) -> Vec<Order> {
        let mut buffer = self.buffer.lock();
        if k == 0 || k >= buffer.len() {
            return std::mem::take(&mut *buffer);
        }
        buffer.drain(..k).collect()
    }

    pub fn count(&self) -> usize {
        self.buffer.lock().len()
    }
}

impl Default for RollingWindowScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use std::thread;

    fn order(id: &str) -> Order {
        Order {
            id: id.to_string(),
            urgency: 0,
            severity: 1,
            sla_minutes: 60,
            eta: Utc::now(),
            region: None,
            payload: serde_json::json!({}),
        }
    }

    #[test]
    fn flush_returns_owned_snapshot_unaffected_by_later_submits() {
        let scheduler = RollingWindowScheduler::new();
        scheduler.submit(order("a"));
        let flushed = scheduler.flush();
        scheduler.submit(order("b"));
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].id, "a");
    }

    #[test]
    fn submit_batch_is_all_or_nothing() {
        let scheduler = RollingWindowScheduler::new();
        scheduler.submit_batch(vec![order("a"), order("b")]).unwrap();
        assert_eq!(scheduler.count(), 2);
    }

    #[test]
    fn peek_all_does_not_drain() {
        let scheduler = RollingWindowScheduler::new();
        scheduler.submit(order("a"));
        let peeked = scheduler.peek_all();
        assert_eq!(peeked.len(), 1);
        assert_eq!(scheduler.count(), 1);
    }

    #[test]
    fn drain_zero_takes_everything() {
        let scheduler = RollingWindowScheduler::new();
        scheduler.submit(order("a"));
        scheduler.submit(order("b"));
        let drained = scheduler.drain(0);
        assert_eq!(drained.len(), 2);
        assert_eq!(scheduler.count(), 0);
    }

    #[test]
    fn drain_k_takes_at_most_k_and_leaves_remainder() {
        let scheduler = RollingWindowScheduler::new();
        scheduler.submit(order("a"));
        scheduler.submit(order("b"));
        scheduler.submit(order("c"));
        let drained = scheduler.drain(2);
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].id, "a");
        assert_eq!(drained[1].id, "b");
        assert_eq!(scheduler.count(), 1);
        let rest = scheduler.drain(10);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, "c");
    }

    #[test]
    fn concurrent_submits_are_all_admitted() {
        let scheduler = Arc::new(RollingWindowScheduler::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let scheduler = scheduler.clone();
            handles.push(thread::spawn(move || {
                scheduler.submit(order(&format!("o{i}")));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(scheduler.count(), 8);
    }
}
