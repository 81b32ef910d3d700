//! Types shared by every kernel crate.
//!
//! Domain-specific records (orders, votes, workflow state) live in the crate
//! that owns them; this module only carries the vocabulary every crate needs
//! to agree on.

use serde::{Deserialize, Serialize};

pub type EntityId = String;
pub type Region = String;
pub type ActorId = String;

/// A unit of work accepted by the dispatcher, before it is admitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: EntityId,
    pub payload: serde_json::Value,
}

/// The outcome of executing a `WorkItem`. `error.is_some()` is a terminal
/// failure for this id; there is no separate "retry" signal at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkResult {
    pub id: EntityId,
    pub output: serde_json::Value,
    pub error: Option<String>,
}

impl WorkResult {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// A dispatch decision bundling generation, reserve and curtailment for a
/// region. Invariants (enforced by construction in `dispatch::plan`):
/// `generation >= demand`, `reserve >= 0`, `curtailment = max(0,
/// generation_before_cap - cap)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub region: Region,
    pub generation: f64,
    pub reserve: f64,
    pub curtailment: f64,
}
