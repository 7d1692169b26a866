pub mod bundle;
pub mod config;
pub mod download;
pub mod fetcher;
pub mod runtime;
pub mod store;
