//! scrapbook-server: HTTP API for the scrapbook item service
//!
//! One collection of user-created todos, each with free text, a completion
//! flag, and an optional attached image. Four operations on a single
//! resource path (list, create, update, delete); inline image payloads are
//! resolved to public URLs before anything reaches the store.

pub mod http;
pub mod media;
pub mod models;
pub mod store;

pub use http::error::ApiError;
pub use http::server::{build_router, run_server, AppState, ServerConfig};
