pub mod account;
pub mod collection;
pub mod provider;
pub mod settings;
