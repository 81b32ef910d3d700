use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Queued,
    Allocated,
    Departed,
    Held,
    Arrived,
    Cancelled,
}

impl EntityState {
    /// `departed` is deliberately **not** terminal — see the open question
    /// this resolves: a vessel/order in transit is still active.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntityState::Arrived | EntityState::Cancelled)
    }

    pub fn can_transition_to(&self, to: EntityState) -> bool {
        use EntityState::*;
        matches!(
            (self, to),
            (Queued, Allocated) | (Queued, Cancelled) | (Queued, Held)
                | (Allocated, Departed) | (Allocated, Cancelled) | (Allocated, Held)
                | (Departed, Arrived) | (Departed, Held)
                | (Held, Queued)
        )
    }
}
