//! `SeaORM` implementation of the `AccountService` trait.

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{AccountId, Entitlement, EntitlementError, SessionContext};
use crate::models::account::{Account, CreditUpdate};
use crate::services::account_service::{AccountError, AccountService, require_fields};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAccountService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAccountService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    /// Runs the purchase transition against the stored balance.
    ///
    /// `snapshot` is only used to reject the amount early. The stored balance
    /// may be ahead of it, so the UPDATE re-checks for overflow.
    async fn apply_purchase(
        &self,
        id: AccountId,
        snapshot: Entitlement,
        amount: i64,
    ) -> Result<Account, AccountError> {
        snapshot.purchase(amount)?;

        let account = match self.store.add_user_credits(id, amount).await? {
            CreditUpdate::Applied(account) => account,
            CreditUpdate::WouldOverflow => {
                warn!(account_id = %id, amount, "Credit purchase refused: balance would overflow");
                return Err(EntitlementError::BalanceOverflow.into());
            }
            CreditUpdate::NotFound => return Err(AccountError::NotFound),
        };

        metrics::counter!("credits_purchased_total").increment(amount.unsigned_abs());
        info!(
            account_id = %id,
            amount,
            balance = account.entitlement.premium_credits,
            tier = ?account.entitlement.tier(),
            "Credits purchased"
        );

        Ok(account)
    }
}

#[async_trait]
impl AccountService for SeaOrmAccountService {
    async fn signup(
        &self,
        username: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<Account, AccountError> {
        require_fields(&[username, password, password_confirm])?;

        if password != password_confirm {
            return Err(AccountError::Validation("Passwords do not match".to_string()));
        }

        let username = username.trim();
        let account = self
            .store
            .create_user(username, password, &self.security)
            .await?
            .ok_or(AccountError::UsernameTaken)?;

        info!(account_id = %account.id, "Account created: {}", account.username);
        Ok(account)
    }

    async fn login(&self, username: &str, password: &str) -> Result<Account, AccountError> {
        require_fields(&[username, password])?;

        let account = self
            .store
            .authenticate_user(username.trim(), password)
            .await?;

        account.ok_or_else(|| {
            warn!("Failed login attempt for {}", username.trim());
            AccountError::InvalidCredentials
        })
    }

    async fn change_password(
        &self,
        session: &SessionContext,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AccountError> {
        require_fields(&[current_password, new_password])?;

        let matches = self
            .store
            .verify_user_password(session.account_id, current_password)
            .await?
            .ok_or(AccountError::NotFound)?;

        if !matches {
            return Err(AccountError::WrongPassword);
        }

        self.store
            .update_user_password(session.account_id, new_password, &self.security)
            .await?;

        info!(account_id = %session.account_id, "Password changed");
        Ok(())
    }

    async fn purchase_credits(
        &self,
        session: &SessionContext,
        amount: i64,
    ) -> Result<SessionContext, AccountError> {
        let account = self
            .apply_purchase(session.account_id, session.entitlement(), amount)
            .await?;

        Ok(session.with_entitlement(account.entitlement))
    }

    async fn grant_credits(&self, username: &str, amount: i64) -> Result<Account, AccountError> {
        let account = self
            .store
            .get_user_by_username(username.trim())
            .await?
            .ok_or(AccountError::NotFound)?;

        self.apply_purchase(account.id, account.entitlement, amount)
            .await
    }
}
