use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub urgency: u32,
    pub severity: u8,
    pub sla_minutes: u32,
    pub eta: DateTime<Utc>,
    pub region: Option<String>,
    pub payload: serde_json::Value,
}

impl Order {
    /// `8 * severity + max(0, 120 - sla_minutes)`.
    pub fn weight(&self) -> i64 {
        8 * self.severity as i64 + (120i64 - self.sla_minutes as i64).max(0)
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Order {}

/// Strictly descending by weight; ties break by ETA ascending, then id
/// ascending. Grounded on the source workspace's `OrderPriority` `Ord` impl
/// generalized from price-priority to weight-priority.
impl Ord for Order {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight()
            .cmp(&other.weight())
            .then_with(|| other.eta.cmp(&self.eta))
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Order {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, severity: u8, sla_minutes: u32, eta: DateTime<Utc>) -> Order {
        Order {
            id: id.to_string(),
            urgency: 0,
            severity,
            sla_minutes,
            eta,
            region: None,
            payload: serde_json::json!({}),
        }
    }

    #[test]
    fn weight_formula_matches_spec() {
        let o = order("o1", 3, 60, Utc::now());
        assert_eq!(o.weight(), 8 * 3 + 60);
    }

    #[test]
    fn weight_clamps_sla_overage_to_zero() {
        let o = order("o1", 1, 200, Utc::now());
        assert_eq!(o.weight(), 8);
    }

    #[test]
    fn higher_weight_sorts_first() {
        let now = Utc::now();
        let low = order("a", 1, 120, now);
        let high = order("b", 5, 120, now);
        assert!(high > low);
    }

    #[test]
    fn ties_break_by_eta_then_id() {
        let now = Utc::now();
        let later = now + chrono::Duration::minutes(5);
        let a = order("a", 1, 120, now);
        let b = order("b", 1, 120, later);
        assert!(a > b);
    }
}
