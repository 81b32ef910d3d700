use serde::{Deserialize, Serialize};
use shared::types::Plan;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub authorized: bool,
    pub reason: Option<String>,
    pub used_quorum: bool,
    pub plan: Option<Plan>,
    pub events_emitted: u32,
    /// Copied from `plan.curtailment` when a plan was built.
    pub curtailment: Option<f64>,
    /// The dispatch weight of the triggering order, when the request
    /// carried one.
    pub outage_priority: Option<u32>,
}

impl Decision {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            authorized: false,
            reason: Some(reason.into()),
            used_quorum: false,
            plan: None,
            events_emitted: 0,
            curtailment: None,
            outage_priority: None,
        }
    }
}
