pub mod account;
pub mod anime;
pub mod collection;
