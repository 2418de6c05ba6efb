//! HTTP server for jsondb.
//!
//! A thin axum layer over a [`jsondb_store::DocumentStore`]: decode the
//! request, call the store on the blocking pool, encode the response. All
//! endpoints operate on one configured collection.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, DEFAULT_COLLECTION};
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::JsonDbServer;
