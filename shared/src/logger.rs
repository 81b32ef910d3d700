//! Structured logging, initialized once by the process that embeds the
//! kernel.

use crate::error::ErrorKind;

/// Installs a JSON-formatted `tracing` subscriber honoring `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .try_init();
}

/// Every denied request is audited with the actor, the permission attempted,
/// and the machine-readable error kind — never a stack trace or a secret.
pub fn log_denied_request(actor_id: &str, permission: &str, kind: ErrorKind) {
    tracing::warn!(
        actor_id = %actor_id,
        permission = %permission,
        reason = %kind.as_str(),
        "request denied"
    );
}

pub fn log_transition(entity_id: &str, to_state: &str, revision: u64) {
    tracing::info!(
        entity_id = %entity_id,
        to_state = %to_state,
        revision = %revision,
        "workflow transition"
    );
}

pub fn log_internal_fault(context: &str, kind: ErrorKind) {
    tracing::error!(context = %context, reason = %kind.as_str(), "internal fault");
}
