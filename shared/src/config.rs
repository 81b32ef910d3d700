//! The kernel's configuration surface.
//!
//! Deliberately a plain struct with a `Default` impl, not a config-file or
//! env-var loader — that belongs to the domain layer, per the "CLI/config
//! loaders" non-goal. Every field has the default named in the external
//! interface contract.

#[derive(Debug, Clone)]
pub struct Config {
    pub breaker_threshold: u32,
    pub breaker_recovery_ms: u64,

    pub retry_base_ms: u64,
    pub retry_max_ms: u64,

    pub checkpoint_threshold: i64,

    pub rate_limit_window_ms: u64,
    pub rate_limit_max: u32,

    pub quorum_timeout_ms: u64,
    pub quorum_voter_roster: Vec<String>,

    /// Coefficient blending severity and wait time in queue-pressure scores.
    /// Left configurable per the open question in the design notes.
    pub severity_pressure_coefficient: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breaker_threshold: 5,
            breaker_recovery_ms: 30_000,
            retry_base_ms: 100,
            retry_max_ms: 60_000,
            checkpoint_threshold: 1_000,
            rate_limit_window_ms: 60_000,
            rate_limit_max: 100,
            quorum_timeout_ms: 5_000,
            quorum_voter_roster: Vec::new(),
            severity_pressure_coefficient: 0.6,
        }
    }
}
