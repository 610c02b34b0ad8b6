//! Command implementations for the gamecat CLI

pub mod catalog;
pub mod database;
pub mod init;
pub mod serve;

pub use catalog::{run_category, run_game};
pub use init::run_init;
pub use serve::run_serve;
