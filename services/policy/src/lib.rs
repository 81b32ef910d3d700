pub mod authorize;
pub mod credential_store;
pub mod roles;

pub use authorize::{
    authorize, can_deescalate, escalation_level, has_any, next_escalation, role_hierarchy,
    should_hold, EscalationLevel, PolicyContext,
};
pub use credential_store::{Credential, CredentialStore};
pub use roles::Role;

use chrono::{DateTime, Utc};
use shared::error::KernelError;

/// Resolves a bearer token into a [`PolicyContext`] by validating it against
/// the process-wide [`CredentialStore`]. Callers that already hold a
/// resolved context (e.g. an in-process caller) skip this and call
/// [`authorize`] directly.
pub fn resolve_context(
    store: &CredentialStore,
    token_id: &str,
    candidate_hash: &[u8],
    now: DateTime<Utc>,
    roles: std::collections::HashSet<String>,
    clearance: u8,
    mfa: bool,
) -> Result<PolicyContext, KernelError> {
    store.validate(token_id, candidate_hash, now)?;
    Ok(PolicyContext {
        actor_id: token_id.to_string(),
        roles,
        clearance,
        mfa,
        idle_s: 0,
    })
}
