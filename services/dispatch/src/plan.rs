//! Dispatch planning: top-k selection, splitting, cost allocation, and
//! region-scoped generation plans.

use crate::order::Order;
use shared::types::Plan;

/// Top-k orders by weight descending. `k <= 0` is empty; `k > orders.len()`
/// returns all of them.
pub fn plan_dispatch(orders: &[Order], k: i64) -> Vec<Order> {
    if k <= 0 {
        return Vec::new();
    }
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted.truncate(k as usize);
    sorted
}

/// Weight-descending order, filtered to `weight >= min_weight`.
pub fn priority_dispatch(orders: &[Order], min_weight: i64) -> Vec<Order> {
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted.retain(|o| o.weight() >= min_weight);
    sorted
}

/// Start offsets `0, s, 2s, ...` in dispatch (weight-descending) order.
pub fn schedule_dispatch(orders: &[Order], spacing_minutes: u32) -> Vec<(String, u32)> {
    let mut sorted: Vec<Order> = orders.to_vec();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, o)| (o.id, i as u32 * spacing_minutes))
        .collect()
}

/// Partitions `total` into `units` shares summing to exactly `total`; the
/// last share absorbs the remainder. `units <= 0` is empty.
pub fn split_dispatch(total: i64, units: i64) -> Vec<i64> {
    if units <= 0 {
        return Vec::new();
    }
    let base = total / units;
    let remainder = total - base * units;
    let mut shares = vec![base; units as usize];
    if let Some(last) = shares.last_mut() {
        *last += remainder;
    }
    shares
}

/// Distributes `total` proportionally to `shares`. Equal shares yield equal
/// outputs; the sum of outputs equals `total` within floating-point
/// tolerance (<= 0.01).
pub fn allocate_costs(total: f64, shares: &[f64]) -> Vec<f64> {
    let sum: f64 = shares.iter().sum();
    if sum == 0.0 {
        return vec![0.0; shares.len()];
    }
    shares.iter().map(|s| total * s / sum).collect()
}

#[derive(Debug, Clone)]
pub struct GenerationUnit {
    pub id: String,
    pub cost: f64,
    pub mw: f64,
}

impl GenerationUnit {
    pub fn cost_per_mw(&self) -> f64 {
        if self.mw == 0.0 {
            f64::INFINITY
        } else {
            self.cost / self.mw
        }
    }
}

/// Ascending by cost-per-MW; stable on ties (input order preserved).
pub fn merit_order(units: &[GenerationUnit]) -> Vec<GenerationUnit> {
    let mut sorted = units.to_vec();
    sorted.sort_by(|a, b| a.cost_per_mw().partial_cmp(&b.cost_per_mw()).unwrap());
    sorted
}

/// Allocations proportional to `weights`, scaled to `sum(demands)`.
pub fn weighted_dispatch(demands: &[f64], weights: &[f64]) -> Vec<f64> {
    let total_demand: f64 = demands.iter().sum();
    allocate_costs(total_demand, weights)
}

#[derive(Debug, Clone)]
pub struct Window {
    pub id: String,
    pub capacity: f64,
}

/// Each batch draws from an **independent** snapshot of `windows` —
/// batch N never sees batch N-1's consumption, so no later batch can be
/// starved by an earlier one. Returns, per batch, the amount satisfied for
/// each of that batch's demands.
pub fn multi_batch_schedule(windows: &[Window], batches: &[Vec<f64>]) -> Vec<Vec<f64>> {
    batches
        .iter()
        .map(|demands| {
            let mut remaining: Vec<f64> = windows.iter().map(|w| w.capacity).collect();
            demands
                .iter()
                .map(|&demand| {
                    let mut satisfied = 0.0;
                    let mut need = demand;
                    for cap in remaining.iter_mut() {
                        if need <= 0.0 {
                            break;
                        }
                        let take = need.min(*cap);
                        *cap -= take;
                        satisfied += take;
                        need -= take;
                    }
                    satisfied
                })
                .collect()
        })
        .collect()
}

/// Blends an order's severity with how long it has waited into a single
/// pressure score, `coefficient * severity + (1 - coefficient) * wait_minutes`.
/// `coefficient` is `Config::severity_pressure_coefficient` (default 0.6) —
/// higher values weight severity over elapsed wait time.
pub fn queue_pressure(order: &Order, wait_minutes: f64, coefficient: f64) -> f64 {
    coefficient * order.severity as f64 + (1.0 - coefficient) * wait_minutes
}

/// `generation = min(generation_before_cap, cap).max(demand)`,
/// `curtailment = max(0, generation_before_cap - cap)`,
/// `reserve = max(0, generation - demand)` — satisfies every invariant in
/// the `Plan` definition by construction.
pub fn build_plan(region: &str, demand: f64, generation_before_cap: f64, cap: f64) -> Plan {
    let generation = generation_before_cap.min(cap).max(demand);
    let curtailment = (generation_before_cap - cap).max(0.0);
    let reserve = (generation - demand).max(0.0);
    Plan {
        region: region.to_string(),
        generation,
        reserve,
        curtailment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(id: &str, severity: u8, sla_minutes: u32) -> Order {
        Order {
            id: id.to_string(),
            urgency: 0,
            severity,
            sla_minutes,
            eta: Utc::now(),
            region: None,
            payload: serde_json::json!({}),
        }
    }

    #[test]
    fn plan_dispatch_returns_top_k_by_weight() {
        let orders = vec![order("a", 1, 100), order("b", 5, 100), order("c", 3, 100)];
        let top = plan_dispatch(&orders, 2);
        assert_eq!(top.iter().map(|o| o.id.clone()).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn plan_dispatch_nonpositive_k_is_empty() {
        let orders = vec![order("a", 1, 100)];
        assert!(plan_dispatch(&orders, 0).is_empty());
        assert!(plan_dispatch(&orders, -5).is_empty());
    }

    #[test]
    fn plan_dispatch_k_larger_than_len_returns_all() {
        let orders = vec![order("a", 1, 100), order("b", 2, 100)];
        assert_eq!(plan_dispatch(&orders, 100).len(), 2);
    }

    #[test]
    fn priority_dispatch_filters_by_min_weight() {
        let orders = vec![order("a", 1, 100), order("b", 5, 100)];
        let result = priority_dispatch(&orders, 30);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "b");
    }

    #[test]
    fn split_dispatch_last_share_absorbs_remainder() {
        let shares = split_dispatch(10, 3);
        assert_eq!(shares, vec![3, 3, 4]);
        assert_eq!(shares.iter().sum::<i64>(), 10);
    }

    #[test]
    fn split_dispatch_nonpositive_units_is_empty() {
        assert!(split_dispatch(10, 0).is_empty());
    }

    #[test]
    fn allocate_costs_sums_to_total_within_tolerance() {
        let shares = vec![1.0, 2.0, 3.0];
        let allocations = allocate_costs(600.0, &shares);
        let sum: f64 = allocations.iter().sum();
        assert!((sum - 600.0).abs() <= 0.01);
    }

    #[test]
    fn allocate_costs_equal_shares_yield_equal_outputs() {
        let shares = vec![1.0, 1.0, 1.0];
        let allocations = allocate_costs(300.0, &shares);
        assert!((allocations[0] - allocations[1]).abs() < 1e-9);
        assert!((allocations[1] - allocations[2]).abs() < 1e-9);
    }

    #[test]
    fn merit_order_sorts_ascending_and_is_stable_on_ties() {
        let units = vec![
            GenerationUnit { id: "a".to_string(), cost: 100.0, mw: 10.0 },
            GenerationUnit { id: "b".to_string(), cost: 50.0, mw: 10.0 },
            GenerationUnit { id: "c".to_string(), cost: 50.0, mw: 10.0 },
        ];
        let sorted = merit_order(&units);
        assert_eq!(sorted[0].id, "b");
        assert_eq!(sorted[1].id, "c");
        assert_eq!(sorted[2].id, "a");
    }

    #[test]
    fn multi_batch_schedule_gives_each_batch_a_fresh_snapshot() {
        let windows = vec![Window { id: "w1".to_string(), capacity: 10.0 }];
        let batches = vec![vec![10.0], vec![10.0]];
        let result = multi_batch_schedule(&windows, &batches);
        assert_eq!(result[0][0], 10.0);
        assert_eq!(result[1][0], 10.0);
    }

    #[test]
    fn build_plan_satisfies_invariants() {
        let plan = build_plan("west", 50.0, 80.0, 60.0);
        assert_eq!(plan.curtailment, 20.0);
        assert_eq!(plan.generation, 60.0);
        assert_eq!(plan.reserve, 10.0);
        assert!(plan.generation >= 50.0);
    }

    #[test]
    fn build_plan_generation_meets_demand_even_under_cap() {
        let plan = build_plan("east", 100.0, 40.0, 60.0);
        assert!(plan.generation >= 100.0);
        assert_eq!(plan.curtailment, 0.0);
    }

    #[test]
    fn queue_pressure_blends_severity_and_wait() {
        let high_severity = order("a", 10, 100);
        let low_severity = order("b", 1, 100);
        assert!(queue_pressure(&high_severity, 0.0, 0.6) > queue_pressure(&low_severity, 0.0, 0.6));
    }

    #[test]
    fn queue_pressure_coefficient_zero_ignores_severity() {
        let o = order("a", 10, 100);
        assert_eq!(queue_pressure(&o, 5.0, 0.0), 5.0);
    }
}
