//! gamecat-server: game catalog HTTP service
//!
//! Opens one shared PostgreSQL pool, creates and seeds the catalog tables on
//! first run, and serves the catalog over HTTP.

pub mod config;
pub mod db;
pub mod http;
pub mod models;

pub use config::{DatabaseSettings, DatabaseTarget};
pub use db::{
    initialize_catalog, Catalog, ConnectionError, ConnectionManager, DataError, InitOutcome,
    InitializationError,
};
pub use http::{run_server, ServerConfig};
