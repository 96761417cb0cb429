pub mod anime;
pub mod collection;
pub mod user;
