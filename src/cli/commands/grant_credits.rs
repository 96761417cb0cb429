//! Grant credits command handler

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountService, SeaOrmAccountService};

pub async fn cmd_grant_credits(config: &Config, username: &str, amount: i64) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let service = SeaOrmAccountService::new(store, config.security.clone());

    let account = service.grant_credits(username, amount).await?;

    println!(
        "✓ {} now has {} credits (premium: {})",
        account.username,
        account.entitlement.premium_credits,
        if account.entitlement.is_premium { "yes" } else { "no" }
    );

    Ok(())
}
