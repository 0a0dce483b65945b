pub mod backup;
pub mod body_sim;
pub mod config;
pub mod core_api;
pub mod layout;
pub mod property;
pub mod store;
