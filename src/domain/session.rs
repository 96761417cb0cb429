use serde::{Deserialize, Serialize};

use super::{AccountId, Entitlement};

/// Per-request identity of the logged in account.
///
/// This is a snapshot taken when the session was written (login, signup or
/// purchase). It is never re-read from storage mid-request; operations that
/// change the entitlement return a new context via [`SessionContext::with_entitlement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub account_id: AccountId,
    pub username: String,
    #[serde(flatten)]
    entitlement: Entitlement,
}

impl SessionContext {
    #[must_use]
    pub const fn new(account_id: AccountId, username: String, entitlement: Entitlement) -> Self {
        Self {
            account_id,
            username,
            entitlement,
        }
    }

    #[must_use]
    pub const fn entitlement(&self) -> Entitlement {
        self.entitlement
    }

    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.entitlement.is_premium
    }

    #[must_use]
    pub const fn premium_credits(&self) -> i64 {
        self.entitlement.premium_credits
    }

    #[must_use]
    pub fn with_entitlement(&self, entitlement: Entitlement) -> Self {
        Self {
            account_id: self.account_id,
            username: self.username.clone(),
            entitlement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_entitlement_leaves_original_untouched() {
        let ctx = SessionContext::new(AccountId::new(1), "alice".into(), Entitlement::free());
        let upgraded = ctx.with_entitlement(Entitlement::new(true, 5));

        assert!(!ctx.is_premium());
        assert_eq!(ctx.premium_credits(), 0);
        assert!(upgraded.is_premium());
        assert_eq!(upgraded.premium_credits(), 5);
        assert_eq!(upgraded.account_id, ctx.account_id);
        assert_eq!(upgraded.username, "alice");
    }

    #[test]
    fn session_round_trips_through_json() {
        let ctx = SessionContext::new(AccountId::new(9), "bob".into(), Entitlement::new(true, 3));
        let value = serde_json::to_value(&ctx).unwrap();
        assert_eq!(value["accountId"], 9);
        assert_eq!(value["isPremium"], true);
        assert_eq!(value["premiumCredits"], 3);

        let back: SessionContext = serde_json::from_value(value).unwrap();
        assert_eq!(back, ctx);
    }
}
