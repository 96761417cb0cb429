//! Domain types for the tracker with strong typing.
//!
//! Everything in here is storage-agnostic: identity, the watch status enum,
//! and the pure rules (ownership, entitlement, sanitization) that the
//! services consult before touching the database.

pub mod entitlement;
pub mod ownership;
pub mod sanitize;
pub mod session;

pub use entitlement::{Entitlement, EntitlementError, Tier};
pub use ownership::{Access, authorize};
pub use session::SessionContext;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an Account.
///
/// Newtype over the `users` primary key so an owner id can never be mixed up
/// with a resource id.
///
/// # Examples
///
/// ```rust
/// use anitrack::domain::AccountId;
///
/// let id = AccountId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId(i32);

impl AccountId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountId> for i32 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl From<i32> for AccountId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Where an entry sits on the owner's watch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    #[default]
    Plan,
    Watching,
    Completed,
    Dropped,
}

impl WatchStatus {
    pub const ALL: [Self; 4] = [Self::Plan, Self::Watching, Self::Completed, Self::Dropped];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Watching => "watching",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four known statuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}'. Expected one of: plan, watching, completed, dropped")]
pub struct InvalidStatus(pub String);

impl FromStr for WatchStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 10;

/// Clamps a user supplied rating into the 0..=10 scale.
#[must_use]
pub fn clamp_rating(rating: i64) -> i32 {
    let clamped = rating.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING));
    i32::try_from(clamped).unwrap_or(MIN_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_conversions() {
        let id = AccountId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(AccountId::from(42), id);
    }

    #[test]
    fn account_id_serialization() {
        let id = AccountId::new(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn watch_status_parses_known_values() {
        assert_eq!("plan".parse::<WatchStatus>(), Ok(WatchStatus::Plan));
        assert_eq!("watching".parse::<WatchStatus>(), Ok(WatchStatus::Watching));
        assert_eq!(
            "completed".parse::<WatchStatus>(),
            Ok(WatchStatus::Completed)
        );
        assert_eq!("dropped".parse::<WatchStatus>(), Ok(WatchStatus::Dropped));
    }

    #[test]
    fn watch_status_rejects_unknown_values() {
        assert!("Watching".parse::<WatchStatus>().is_err());
        assert!("paused".parse::<WatchStatus>().is_err());
        assert!("".parse::<WatchStatus>().is_err());
    }

    #[test]
    fn watch_status_defaults_to_plan() {
        assert_eq!(WatchStatus::default(), WatchStatus::Plan);
        assert_eq!(
            serde_json::to_string(&WatchStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn rating_is_clamped() {
        assert_eq!(clamp_rating(-4), 0);
        assert_eq!(clamp_rating(0), 0);
        assert_eq!(clamp_rating(7), 7);
        assert_eq!(clamp_rating(10), 10);
        assert_eq!(clamp_rating(11), 10);
        assert_eq!(clamp_rating(i64::MAX), 10);
    }
}
