use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::domain::{AccountId, Entitlement};
use crate::entities::users;
use crate::models::account::{Account, CreditUpdate};

impl From<users::Model> for Account {
    fn from(model: users::Model) -> Self {
        Self {
            id: AccountId::new(model.id),
            username: model.username,
            entitlement: Entitlement::new(model.is_premium, model.premium_credits),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Create an account with a freshly hashed password.
    /// Returns `None` when the username is already taken.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();
        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_premium: Set(false),
            premium_credits: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Account::from(model))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    /// Get account by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(Account::from))
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(Account::from))
    }

    /// Check a username/password pair and return the account when it matches.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Account>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        if verify_hash(user.password_hash.clone(), password).await? {
            Ok(Some(Account::from(user)))
        } else {
            Ok(None)
        }
    }

    /// Verify the password of an account by ID.
    /// `None` means the account no longer exists.
    pub async fn verify_password(&self, id: AccountId, password: &str) -> Result<Option<bool>> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        match user {
            Some(user) => Ok(Some(verify_hash(user.password_hash, password).await?)),
            None => Ok(None),
        }
    }

    /// Update password for an account (hashes the new password)
    pub async fn update_password(
        &self,
        id: AccountId,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let user = users::Entity::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {id}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Add credits and set the premium flag in a single UPDATE so concurrent
    /// purchases cannot lose each other's increments. The UPDATE only matches
    /// while the sum still fits in an `i64`; SQLite would otherwise store it
    /// as REAL.
    pub async fn add_credits(&self, id: AccountId, amount: i64) -> Result<CreditUpdate> {
        let now = chrono::Utc::now().to_rfc3339();
        let ceiling = i64::MAX.saturating_sub(amount);

        let result = users::Entity::update_many()
            .col_expr(
                users::Column::PremiumCredits,
                Expr::col(users::Column::PremiumCredits).add(amount),
            )
            .col_expr(users::Column::IsPremium, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id.value()))
            .filter(users::Column::PremiumCredits.lte(ceiling))
            .exec(&self.conn)
            .await
            .context("Failed to add premium credits")?;

        if result.rows_affected == 0 {
            return Ok(match self.get_by_id(id).await? {
                Some(_) => CreditUpdate::WouldOverflow,
                None => CreditUpdate::NotFound,
            });
        }

        Ok(self
            .get_by_id(id)
            .await?
            .map_or(CreditUpdate::NotFound, CreditUpdate::Applied))
    }
}

/// Argon2 verification is CPU-intensive, so it runs on the blocking pool.
async fn verify_hash(password_hash: String, password: &str) -> Result<bool> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the argon2 crate defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
