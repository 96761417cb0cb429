use crate::domain::{AccountId, Entitlement, SessionContext};

/// Account data without the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub entitlement: Entitlement,
    pub created_at: String,
    pub updated_at: String,
}

impl Account {
    /// Builds the session snapshot for this account.
    #[must_use]
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.id, self.username.clone(), self.entitlement)
    }
}

/// Outcome of adding credits to a stored balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditUpdate {
    Applied(Account),
    /// The stored balance plus the amount does not fit in an `i64`.
    WouldOverflow,
    NotFound,
}
