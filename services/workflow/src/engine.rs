//! The workflow state machine engine.
//!
//! Grounded on the source workspace's `OrderService`: a
//! `DashMap<String, Arc<Mutex<EntityRecord>>>` gives per-id exclusive
//! sections (the per-entity lock the concurrency model requires), plus one
//! engine-level `RwLock<()>` taken for whole-map operations. Unlike
//! `OrderService`'s private `events: DashMap<Uuid, Vec<OrderEvent>>`,
//! transitions here emit into the shared [`events::EventLog`] — the one log
//! the rest of the kernel reads.

use crate::state::EntityState;
use chrono::Utc;
use dashmap::DashMap;
use events::{Event, EventLog};
use parking_lot::{Mutex, RwLock};
use shared::clock::SequenceGenerator;
use shared::error::{ErrorKind, KernelError};
use shared::persistence::PersistenceHandle;
use std::sync::Arc;

struct EntityRecord {
    state: EntityState,
    revision: u64,
}

pub struct WorkflowEngine<P: PersistenceHandle> {
    entities: DashMap<String, Arc<Mutex<EntityRecord>>>,
    engine_lock: RwLock<()>,
    events: Arc<EventLog<P>>,
    sequence: Arc<SequenceGenerator>,
}

impl<P: PersistenceHandle> WorkflowEngine<P> {
    pub fn new(events: Arc<EventLog<P>>, sequence: Arc<SequenceGenerator>) -> Self {
        Self {
            entities: DashMap::new(),
            engine_lock: RwLock::new(()),
            events,
            sequence,
        }
    }

    /// Registers a new entity in `initial`. Re-registering an existing
    /// entity in a terminal state resets it to `queued`; re-registering a
    /// non-terminal entity fails with `already_registered`.
    pub fn register(&self, entity: &str, initial: EntityState) -> Result<(), KernelError> {
        let _guard = self.engine_lock.read();
        self.register_locked(entity, initial)
    }

    /// Body of `register`, assuming the caller already holds `engine_lock`
    /// (read or write). `parking_lot::RwLock` is non-reentrant, so this must
    /// never call back into `register`.
    fn register_locked(&self, entity: &str, initial: EntityState) -> Result<(), KernelError> {
        if let Some(existing) = self.entities.get(entity) {
            let mut record = existing.lock();
            if !record.state.is_terminal() {
                return Err(KernelError::new(
                    ErrorKind::AlreadyRegistered,
                    format!("entity {entity} already registered"),
                ));
            }
            record.state = EntityState::Queued;
            record.revision += 1;
            return Ok(());
        }
        self.entities.insert(
            entity.to_string(),
            Arc::new(Mutex::new(EntityRecord {
                state: initial,
                revision: 0,
            })),
        );
        Ok(())
    }

    /// Atomic: consults the allowed-transition table; on success increments
    /// the entity's revision and emits an event into the shared log.
    pub async fn transition(&self, entity: &str, to: EntityState) -> Result<u64, KernelError> {
        let record_arc = self
            .entities
            .get(entity)
            .map(|r| r.clone())
            .ok_or_else(|| KernelError::new(ErrorKind::InvalidInput, "unknown entity"))?;

        let revision = {
            let mut record = record_arc.lock();
            if !record.state.can_transition_to(to) {
                return Err(KernelError::new(
                    ErrorKind::InvalidTransition,
                    format!("{:?} -> {:?} not allowed", record.state, to),
                ));
            }
            record.state = to;
            record.revision += 1;
            record.revision
        };

        self.events
            .append(Event {
                sequence: self.sequence.next_seq(),
                id: format!("{entity}-{revision}"),
                event_type: format!("{to:?}").to_lowercase(),
                region: None,
                timestamp: Utc::now(),
                payload: serde_json::json!({ "entity": entity, "revision": revision }),
            })
            .await?;

        Ok(revision)
    }

    /// Atomic composition of `register` and `transition` under one hold of
    /// the engine lock. Calls `register_locked` rather than `register` —
    /// `register` would try to take `engine_lock.read()` again while this
    /// write guard is still live, which `parking_lot::RwLock` (non-reentrant)
    /// would deadlock on.
    pub async fn register_and_transition(
        &self,
        entity: &str,
        initial: EntityState,
        to: EntityState,
    ) -> Result<u64, KernelError> {
        let _guard = self.engine_lock.write();
        self.register_locked(entity, initial)?;
        self.transition(entity, to).await
    }

    /// Entities in non-terminal states. `departed` counts as active.
    pub fn active_count(&self) -> usize {
        let _guard = self.engine_lock.read();
        self.entities
            .iter()
            .filter(|entry| !entry.value().lock().state.is_terminal())
            .count()
    }

    pub fn state_of(&self, entity: &str) -> Option<EntityState> {
        self.entities.get(entity).map(|r| r.lock().state)
    }

    pub fn can_deliver(&self, entity: &str) -> bool {
        self.state_of(entity) == Some(EntityState::Departed)
    }
}
