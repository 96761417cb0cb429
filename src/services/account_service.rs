//! Domain service for accounts: signup, login, password changes and the
//! premium credit purchase.

use crate::domain::{EntitlementError, SessionContext};
use crate::models::account::Account;
use thiserror::Error;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),

    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    WrongPassword,

    #[error("Account not found")]
    NotFound,

    #[error("Username already in use")]
    UsernameTaken,

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for accounts.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new free account.
    ///
    /// # Errors
    ///
    /// - Returns [`AccountError::Validation`] if a field is blank or the passwords differ
    /// - Returns [`AccountError::UsernameTaken`] if the username is already registered
    async fn signup(
        &self,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Account, AccountError>;

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<Account, AccountError>;

    /// Changes the password of the session's account.
    ///
    /// # Errors
    ///
    /// - Returns [`AccountError::Validation`] if a field is blank
    /// - Returns [`AccountError::WrongPassword`] if `current_password` does not match
    /// - Returns [`AccountError::NotFound`] if the account no longer exists
    async fn change_password(
        &self,
        session: &SessionContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError>;

    /// Buys `amount` credits for the session's account and returns the
    /// refreshed session snapshot.
    ///
    /// # Errors
    ///
    /// - Returns [`AccountError::Entitlement`] if `amount` is not positive
    /// - Returns [`AccountError::NotFound`] if the account no longer exists
    async fn purchase_credits(
        &self,
        session: &SessionContext,
        amount: i64,
    ) -> Result<SessionContext, AccountError>;

    /// Applies the same purchase transition to an account looked up by name.
    ///
    /// # Errors
    ///
    /// Same as [`AccountService::purchase_credits`].
    async fn grant_credits(&self, username: &str, amount: i64) -> Result<Account, AccountError>;
}

/// Rejects blank required fields with the shared message.
pub(crate) fn require_fields(fields: &[&str]) -> Result<(), AccountError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(AccountError::Validation("All fields are required".to_string()));
    }
    Ok(())
}
