use crate::domain::{AccountId, Access, authorize};
use tracing::warn;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{AccountError, AccountService};
pub use account_service_impl::SeaOrmAccountService;

pub mod anime_service;
pub mod anime_service_impl;
pub use anime_service::{AnimeError, AnimeService};
pub use anime_service_impl::SeaOrmAnimeService;

pub mod collection_service;
pub mod collection_service_impl;
pub use collection_service::{CollectionError, CollectionService};
pub use collection_service_impl::SeaOrmCollectionService;

/// Ownership check shared by the resource services. A refusal is counted and
/// logged before the caller turns it into its own error type.
pub(crate) fn check_owner(
    requester: AccountId,
    owner: AccountId,
    resource: &'static str,
    id: &str,
) -> Access {
    let access = authorize(requester, owner);
    if !access.is_allowed() {
        metrics::counter!("ownership_denials_total", "resource" => resource).increment(1);
        warn!(
            account_id = %requester,
            owner = %owner,
            "Refused access to {resource} {id}"
        );
    }
    access
}
