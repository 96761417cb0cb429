pub use super::anime_entries::Entity as AnimeEntries;
pub use super::collections::Entity as Collections;
pub use super::users::Entity as Users;
