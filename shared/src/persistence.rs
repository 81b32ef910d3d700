//! The kernel's only storage seam.
//!
//! The kernel does not own a concrete store — `services/events` calls
//! through this trait after an event has already passed the in-memory
//! dedup/ordering step, so a domain layer can back it with a file, a table,
//! or nothing at all.

use crate::error::KernelError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEvent {
    pub sequence: i64,
    pub id: String,
    pub event_type: String,
    pub payload: serde_json::Value,
}

#[async_trait]
pub trait PersistenceHandle: Send + Sync {
    async fn append(&self, event: &PersistedEvent) -> Result<(), KernelError>;
}

/// Discards everything. The default for tests and for domain layers that
/// don't need durability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPersistence;

#[async_trait]
impl PersistenceHandle for NoopPersistence {
    async fn append(&self, _event: &PersistedEvent) -> Result<(), KernelError> {
        Ok(())
    }
}
