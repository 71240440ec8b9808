//! scrapbook-core: shared configuration for the scrapbook service
//!
//! The server binary loads everything it needs from here once at startup
//! and passes the typed sections down by value.

pub mod config;

pub use config::{AppConfig, ConfigError, HttpConfig, MediaConfig, StoreConfig};
