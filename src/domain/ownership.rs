//! Ownership guard for mutating operations on anime and collections.
//!
//! Reads never go through here: list and search queries are built with
//! `owner = <session account>` so other owners' rows are never selected.

use super::AccountId;

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbid,
}

impl Access {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides whether `requester` may update or delete a resource owned by `owner`.
#[must_use]
pub fn authorize(requester: AccountId, owner: AccountId) -> Access {
    if requester == owner {
        Access::Allow
    } else {
        Access::Forbid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_allowed() {
        let id = AccountId::new(1);
        assert_eq!(authorize(id, id), Access::Allow);
        assert!(authorize(id, id).is_allowed());
    }

    #[test]
    fn other_accounts_are_forbidden() {
        let alice = AccountId::new(1);
        let bob = AccountId::new(2);
        assert_eq!(authorize(bob, alice), Access::Forbid);
        assert_eq!(authorize(alice, bob), Access::Forbid);
        assert!(!authorize(alice, bob).is_allowed());
    }

    #[test]
    fn decision_is_stable() {
        let a = AccountId::new(10);
        let b = AccountId::new(11);
        for _ in 0..3 {
            assert_eq!(authorize(a, b), Access::Forbid);
            assert_eq!(authorize(b, b), Access::Allow);
        }
    }
}
