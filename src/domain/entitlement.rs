//! Premium entitlement state machine.
//!
//! An account starts `Free`. Any positive credit purchase adds to the balance
//! and moves it to `Premium`, which is permanent. Credits are a display
//! balance: nothing spends them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntitlementError {
    #[error("Invalid amount: {0}. Amount must be a positive integer")]
    InvalidAmount(i64),

    #[error("Credit balance would overflow")]
    BalanceOverflow,

    #[error("Premium access required to create collections")]
    PremiumRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Free,
    Premium,
}

/// Snapshot of an account's `{isPremium, premiumCredits}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    pub is_premium: bool,
    pub premium_credits: i64,
}

impl Entitlement {
    #[must_use]
    pub const fn new(is_premium: bool, premium_credits: i64) -> Self {
        Self {
            is_premium,
            premium_credits,
        }
    }

    #[must_use]
    pub const fn free() -> Self {
        Self::new(false, 0)
    }

    #[must_use]
    pub const fn tier(&self) -> Tier {
        if self.is_premium {
            Tier::Premium
        } else {
            Tier::Free
        }
    }

    /// Checks that `amount` is an acceptable purchase without applying it.
    pub const fn validate_purchase(amount: i64) -> Result<i64, EntitlementError> {
        if amount <= 0 {
            return Err(EntitlementError::InvalidAmount(amount));
        }
        Ok(amount)
    }

    /// Applies a credit purchase and returns the resulting state.
    ///
    /// `self` is left untouched on failure.
    pub fn purchase(self, amount: i64) -> Result<Self, EntitlementError> {
        let amount = Self::validate_purchase(amount)?;
        let premium_credits = self
            .premium_credits
            .checked_add(amount)
            .ok_or(EntitlementError::BalanceOverflow)?;

        Ok(Self {
            is_premium: true,
            premium_credits,
        })
    }

    /// Only the premium flag matters here; the balance is irrelevant.
    #[must_use]
    pub const fn can_create_collection(&self) -> bool {
        self.is_premium
    }

    pub const fn require_collection_access(&self) -> Result<(), EntitlementError> {
        if self.can_create_collection() {
            Ok(())
        } else {
            Err(EntitlementError::PremiumRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_purchase_unlocks_premium() {
        let state = Entitlement::free().purchase(5).unwrap();
        assert!(state.is_premium);
        assert_eq!(state.premium_credits, 5);
        assert_eq!(state.tier(), Tier::Premium);
    }

    #[test]
    fn later_purchases_accumulate() {
        let state = Entitlement::free().purchase(5).unwrap().purchase(10).unwrap();
        assert!(state.is_premium);
        assert_eq!(state.premium_credits, 15);
    }

    #[test]
    fn smallest_purchase_still_unlocks() {
        let state = Entitlement::free().purchase(1).unwrap();
        assert!(state.can_create_collection());
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let before = Entitlement::free();
        assert_eq!(
            before.purchase(0),
            Err(EntitlementError::InvalidAmount(0))
        );
        assert_eq!(
            before.purchase(-3),
            Err(EntitlementError::InvalidAmount(-3))
        );
        assert_eq!(before, Entitlement::free());
        assert_eq!(before.tier(), Tier::Free);
    }

    #[test]
    fn overflow_is_rejected() {
        let state = Entitlement::new(true, i64::MAX);
        assert_eq!(state.purchase(1), Err(EntitlementError::BalanceOverflow));
    }

    #[test]
    fn gate_ignores_balance() {
        assert!(!Entitlement::new(false, 100).can_create_collection());
        assert!(Entitlement::new(true, 0).can_create_collection());
        assert_eq!(
            Entitlement::free().require_collection_access(),
            Err(EntitlementError::PremiumRequired)
        );
        assert!(Entitlement::new(true, 0).require_collection_access().is_ok());
    }

    #[test]
    fn serializes_with_wire_names() {
        let json = serde_json::to_value(Entitlement::new(true, 5)).unwrap();
        assert_eq!(json["isPremium"], true);
        assert_eq!(json["premiumCredits"], 5);
    }
}
