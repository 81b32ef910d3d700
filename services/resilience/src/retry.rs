//! Retry backoff and replay budget.

/// Delay at attempt `n`: `base * 2^n`, capped at `max_delay_ms`. Saturating
/// throughout so a large `n` returns `max_delay_ms` rather than wrapping.
pub fn retry_backoff(base_ms: u64, n: u32, max_delay_ms: u64) -> u64 {
    let multiplier = 1u64.checked_shl(n).unwrap_or(u64::MAX);
    base_ms.saturating_mul(multiplier).min(max_delay_ms)
}

/// Max events to replay in a single window. A timeout-derived cap
/// (`timeout_seconds + 1`) and `event_count` are blended with a
/// harmonic-mean-style scale (`e*c/(e+c)`) rather than a flat `min`, so the
/// result is *strictly* increasing in `event_count` for a fixed cap (not just
/// non-decreasing) while still never exceeding either input. Always at least
/// 1 when `event_count > 0`.
pub fn replay_budget(event_count: u64, timeout_seconds: u64) -> u64 {
    if event_count == 0 {
        return 0;
    }
    let cap = timeout_seconds.saturating_add(1);
    let denom = event_count.saturating_add(cap);
    let scaled = event_count.saturating_mul(cap) / denom;
    scaled.max(1).min(event_count)
}
