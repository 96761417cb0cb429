use crate::domain::AccountId;

/// A named grouping of anime ids owned by one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: String,
    pub owner: AccountId,
    pub name: String,
    pub description: String,
    pub anime_ids: Vec<String>,
    pub created_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewCollection {
    pub name: String,
    pub description: Option<String>,
    pub anime_ids: Option<Vec<String>>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct CollectionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub anime_ids: Option<Vec<String>>,
}

impl Collection {
    /// Appends `anime_id` unless it is already a member. Returns whether the
    /// list changed.
    pub fn add_member(&mut self, anime_id: &str) -> bool {
        if self.anime_ids.iter().any(|id| id == anime_id) {
            return false;
        }
        self.anime_ids.push(anime_id.to_string());
        true
    }

    /// Drops every occurrence of `anime_id`. Returns whether the list changed.
    pub fn remove_member(&mut self, anime_id: &str) -> bool {
        let before = self.anime_ids.len();
        self.anime_ids.retain(|id| id != anime_id);
        self.anime_ids.len() != before
    }
}

/// Removes repeated ids, keeping the first occurrence of each.
#[must_use]
pub fn dedup_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
