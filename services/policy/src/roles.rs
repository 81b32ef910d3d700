//! The illustrative role/permission table.
//!
//! The distilled spec deliberately leaves the role set undefined ("the spec
//! defines the evaluator, not the data"). This table is a documented,
//! overridable default so the evaluator is exercisable out of the box.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Observer,
    Operator,
    Dispatcher,
    Supervisor,
    GridAdmin,
    Superuser,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Role> {
        match s {
            "observer" => Some(Role::Observer),
            "operator" => Some(Role::Operator),
            "dispatcher" => Some(Role::Dispatcher),
            "supervisor" => Some(Role::Supervisor),
            "grid_admin" => Some(Role::GridAdmin),
            "superuser" => Some(Role::Superuser),
            _ => None,
        }
    }

    /// Rank used for the hierarchy: a higher-ranked role includes every
    /// permission of strictly lower ranks. `GridAdmin` and `Superuser` share
    /// the top rank.
    fn rank(&self) -> u8 {
        match self {
            Role::Observer => 0,
            Role::Operator => 1,
            Role::Dispatcher => 2,
            Role::Supervisor => 3,
            Role::GridAdmin => 4,
            Role::Superuser => 4,
        }
    }

    const ALL: [Role; 6] = [
        Role::Observer,
        Role::Operator,
        Role::Dispatcher,
        Role::Supervisor,
        Role::GridAdmin,
        Role::Superuser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Observer => "observer",
            Role::Operator => "operator",
            Role::Dispatcher => "dispatcher",
            Role::Supervisor => "supervisor",
            Role::GridAdmin => "grid_admin",
            Role::Superuser => "superuser",
        }
    }

    /// Every role at or below this role's rank, ordered lowest to highest.
    pub fn hierarchy(&self) -> Vec<Role> {
        let my_rank = self.rank();
        let mut roles: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|r| r.rank() <= my_rank)
            .collect();
        roles.sort_by_key(|r| r.rank());
        roles
    }

    pub fn permissions(&self) -> HashSet<&'static str> {
        let mut perms = HashSet::new();
        perms.insert("read");
        if self.rank() >= Role::Operator.rank() {
            perms.insert("enqueue");
            perms.insert("transition");
        }
        if self.rank() >= Role::Dispatcher.rank() {
            perms.insert("override_priority");
            perms.insert("force_transition");
        }
        if self.rank() >= Role::Supervisor.rank() {
            perms.insert("escalate");
            perms.insert("quorum_propose");
        }
        if self.rank() >= Role::GridAdmin.rank() {
            perms.insert("admin_reset");
        }
        perms
    }
}

/// Every permission except `read` requires MFA when exercised.
pub fn is_write_class(permission: &str) -> bool {
    permission != "read"
}
