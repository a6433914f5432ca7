//! The role-scoped status transition table.
//!
//! Policy lives in one exhaustively enumerable table keyed by
//! `(role, current, target)` instead of nested conditionals. Ownership
//! (a user may only touch their own appointment) is checked by the service
//! layer before this table is consulted.

use crate::appointment::{Role, Status};

/// Whether `role` may move an appointment from `current` to `target`.
///
/// Terminal sources always deny; the service layer distinguishes the
/// terminal-state case so it can report it as such. No role may ever set
/// `Pending` - it is reachable only at creation.
pub fn is_allowed(role: Role, current: Status, target: Status) -> bool {
    use Status::*;

    match (role, current, target) {
        (_, _, Pending) => false,
        (Role::User, Pending | Confirmed, Cancelled) => true,
        (Role::User, _, _) => false,
        (Role::Admin, Pending | Confirmed, _) => true,
        (Role::Admin, _, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::Status::*;

    #[test]
    fn nothing_transitions_to_pending() {
        for role in [Role::User, Role::Admin] {
            for current in Status::ALL {
                assert!(!is_allowed(role, current, Pending));
            }
        }
    }

    #[test]
    fn terminal_sources_deny_everything() {
        for role in [Role::User, Role::Admin] {
            for current in [Cancelled, Completed] {
                for target in Status::ALL {
                    assert!(!is_allowed(role, current, target), "{role:?} {current} -> {target}");
                }
            }
        }
    }

    #[test]
    fn users_may_only_cancel() {
        for current in Status::ALL {
            for target in Status::ALL {
                let allowed = is_allowed(Role::User, current, target);
                if allowed {
                    assert_eq!(target, Cancelled);
                    assert!(matches!(current, Pending | Confirmed));
                }
            }
        }
    }

    #[test]
    fn admin_full_table() {
        for current in [Pending, Confirmed] {
            for target in [Confirmed, Cancelled, Completed] {
                assert!(is_allowed(Role::Admin, current, target), "{current} -> {target}");
            }
        }
    }
}
