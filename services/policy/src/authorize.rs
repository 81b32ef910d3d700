//! The authorization evaluator.
//!
//! Grounded on the teacher's `AuthService` lookup/verify shape, replaced
//! end to end: no JWTs, no password hashing — a `PolicyContext` is handed
//! in already resolved (by `resolve_context` for bearer-token callers, see
//! `credential_store`), and `authorize` is a pure function of that context,
//! the role table, and the fixed permission-to-clearance table below.

use crate::roles::{is_write_class, Role};
use serde::{Deserialize, Serialize};
use shared::error::{ErrorKind, KernelError};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyContext {
    pub actor_id: String,
    pub roles: HashSet<String>,
    pub clearance: u8,
    pub mfa: bool,
    pub idle_s: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationLevel {
    Normal,
    Watch,
    Restricted,
    Halted,
}

impl EscalationLevel {
    /// Incident-count threshold that pushes the level to the next one up.
    pub fn threshold(&self) -> u32 {
        match self {
            EscalationLevel::Normal => 3,
            EscalationLevel::Watch => 6,
            EscalationLevel::Restricted => 10,
            EscalationLevel::Halted => u32::MAX,
        }
    }
}

/// Minimum clearance (0..5) required to exercise a permission. A permission
/// absent from every role's table (and therefore unreachable) is treated as
/// requiring clearance 5 — unattainable by the fixed role table, so it can
/// only be granted by a domain layer that overrides the table.
fn required_clearance(permission: &str) -> u8 {
    match permission {
        "read" => 0,
        "enqueue" | "transition" => 1,
        "override_priority" | "force_transition" => 2,
        "escalate" | "quorum_propose" => 3,
        "admin_reset" => 4,
        _ => 5,
    }
}

fn highest_role(ctx: &PolicyContext) -> Option<Role> {
    ctx.roles
        .iter()
        .filter_map(|r| Role::from_str(r))
        .max_by_key(|r| r.hierarchy().len())
}

/// `{allowed, reason}` collapsed into `Result<(), KernelError>`: `Ok(())` is
/// `allowed=true`; `Err` carries the machine-readable reason.
pub fn authorize(ctx: &PolicyContext, permission: &str) -> Result<(), KernelError> {
    let role = match highest_role(ctx) {
        Some(role) => role,
        None => {
            return Err(KernelError::new(
                ErrorKind::Unauthorized,
                "unknown_role",
            ))
        }
    };

    if !role.permissions().contains(permission) {
        return Err(KernelError::new(ErrorKind::Unauthorized, "unknown_role"));
    }

    if is_write_class(permission) && !ctx.mfa {
        return Err(KernelError::new(ErrorKind::NoMfa, "mfa required for write-class permission"));
    }

    if ctx.clearance < required_clearance(permission) {
        return Err(KernelError::new(
            ErrorKind::Unauthorized,
            "insufficient_clearance",
        ));
    }

    Ok(())
}

pub fn role_hierarchy(role: &str) -> Vec<String> {
    Role::from_str(role)
        .map(|r| r.hierarchy().iter().map(|h| h.as_str().to_string()).collect())
        .unwrap_or_default()
}

pub fn has_any(ctx: &PolicyContext, perms: &[&str]) -> bool {
    perms.iter().any(|p| authorize(ctx, p).is_ok())
}

pub fn escalation_level(incidents: u32, severity: u32) -> EscalationLevel {
    let pressure = incidents.saturating_add(severity);
    if pressure >= EscalationLevel::Restricted.threshold() {
        EscalationLevel::Halted
    } else if pressure >= EscalationLevel::Watch.threshold() {
        EscalationLevel::Restricted
    } else if pressure >= EscalationLevel::Normal.threshold() {
        EscalationLevel::Watch
    } else {
        EscalationLevel::Normal
    }
}

pub fn next_escalation(level: EscalationLevel) -> EscalationLevel {
    match level {
        EscalationLevel::Normal => EscalationLevel::Watch,
        EscalationLevel::Watch => EscalationLevel::Restricted,
        EscalationLevel::Restricted => EscalationLevel::Halted,
        EscalationLevel::Halted => EscalationLevel::Halted,
    }
}

/// Deescalation from `level` requires `consecutive_successes >= 2 *
/// threshold(level)`.
pub fn can_deescalate(level: EscalationLevel, consecutive_successes: u32) -> bool {
    consecutive_successes as u64 >= 2 * level.threshold() as u64
}

pub fn should_hold(_amount: f64, level: EscalationLevel) -> bool {
    level == EscalationLevel::Halted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(roles: &[&str], clearance: u8, mfa: bool) -> PolicyContext {
        PolicyContext {
            actor_id: "a1".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            clearance,
            mfa,
            idle_s: 0,
        }
    }

    #[test]
    fn unknown_role_denies_all() {
        let c = ctx(&["auditor"], 5, true);
        let err = authorize(&c, "read").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, "unknown_role");
    }

    #[test]
    fn observer_can_read_but_not_enqueue() {
        let c = ctx(&["observer"], 5, true);
        assert!(authorize(&c, "read").is_ok());
        let err = authorize(&c, "enqueue").unwrap_err();
        assert_eq!(err.message, "unknown_role");
    }

    #[test]
    fn write_class_without_mfa_is_denied() {
        let c = ctx(&["operator"], 5, false);
        let err = authorize(&c, "enqueue").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoMfa);
    }

    #[test]
    fn insufficient_clearance_is_denied_even_with_mfa() {
        let c = ctx(&["dispatcher"], 0, true);
        let err = authorize(&c, "override_priority").unwrap_err();
        assert_eq!(err.message, "insufficient_clearance");
    }

    #[test]
    fn grid_admin_can_admin_reset() {
        let c = ctx(&["grid_admin"], 5, true);
        assert!(authorize(&c, "admin_reset").is_ok());
    }

    #[test]
    fn deescalation_requires_double_threshold() {
        assert!(!can_deescalate(EscalationLevel::Watch, 5));
        assert!(can_deescalate(EscalationLevel::Watch, 6));
    }

    #[test]
    fn should_hold_only_when_halted() {
        assert!(!should_hold(100.0, EscalationLevel::Restricted));
        assert!(should_hold(100.0, EscalationLevel::Halted));
    }

    #[test]
    fn has_any_is_true_when_one_permission_authorizes() {
        let c = ctx(&["operator"], 5, true);
        assert!(has_any(&c, &["admin_reset", "enqueue"]));
    }
}
