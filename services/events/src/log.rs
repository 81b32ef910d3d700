//! The append-only event log.
//!
//! Shaped like the source workspace's `Ledger`: an `Arc<RwLock<Vec<_>>>` of
//! append-only entries plus an index for O(1) dedup lookups, except the
//! index here tracks `id` (the log's dedup key) rather than an account id.

use crate::event::Event;
use dashmap::DashSet;
use parking_lot::RwLock;
use shared::error::{ErrorKind, KernelError};
use shared::persistence::{PersistedEvent, PersistenceHandle};
use std::collections::HashMap;
use std::sync::Arc;

pub struct EventLog<P: PersistenceHandle> {
    events: RwLock<Vec<Event>>,
    seen_ids: DashSet<String>,
    persistence: Arc<P>,
}

impl<P: PersistenceHandle> EventLog<P> {
    pub fn new(persistence: Arc<P>) -> Self {
        Self {
            events: RwLock::new(Vec::new()),
            seen_ids: DashSet::new(),
            persistence,
        }
    }

    /// Appends `event` unless its `id` has already been seen, in which case
    /// the original entry is retained and this call is a no-op. Durable
    /// persistence only happens for entries that are actually admitted.
    pub async fn append(&self, event: Event) -> Result<(), KernelError> {
        if !self.seen_ids.insert(event.id.clone()) {
            return Ok(());
        }

        let persisted = PersistedEvent {
            sequence: event.sequence,
            id: event.id.clone(),
            event_type: event.event_type.clone(),
            payload: event.payload.clone(),
        };

        self.events.write().push(event);
        self.persistence.append(&persisted).await
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Ascending by `sequence`. Stable: entries with equal sequence retain
    /// their relative append order.
    pub fn sort_by_sequence(&self) -> Vec<Event> {
        let mut events = self.snapshot();
        events.sort_by_key(|e| e.sequence);
        events
    }

    /// Events with `lo <= sequence <= hi`.
    pub fn window(&self, lo: i64, hi: i64) -> Result<Vec<Event>, KernelError> {
        if lo > hi {
            return Err(KernelError::new(
                ErrorKind::OutOfRange,
                format!("window lo={lo} > hi={hi}"),
            ));
        }
        Ok(self
            .sort_by_sequence()
            .into_iter()
            .filter(|e| e.sequence >= lo && e.sequence <= hi)
            .collect())
    }

    /// Indices (into the sorted sequence) where the gap to the next entry
    /// exceeds 1.
    pub fn gaps(&self) -> Vec<usize> {
        let sorted = self.sort_by_sequence();
        sorted
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1].sequence - pair[0].sequence > 1)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn group_by_region(&self) -> HashMap<String, Vec<Event>> {
        let mut groups: HashMap<String, Vec<Event>> = HashMap::new();
        for event in self.snapshot() {
            let key = event.region.clone().unwrap_or_default();
            groups.entry(key).or_default().push(event);
        }
        groups
    }

    pub fn group_by_type(&self) -> HashMap<String, Vec<Event>> {
        let mut groups: HashMap<String, Vec<Event>> = HashMap::new();
        for event in self.snapshot() {
            groups.entry(event.event_type.clone()).or_default().push(event);
        }
        groups
    }

    /// 0 for an empty log.
    pub fn max_sequence(&self) -> i64 {
        self.events.read().iter().map(|e| e.sequence).max().unwrap_or(0)
    }
}
