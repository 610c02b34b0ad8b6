//! Catalog initialization command

use anyhow::{Context, Result};
use clap::Parser;

use gamecat_server::{initialize_catalog, InitOutcome};

use super::database::DatabaseArgs;

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create and seed the catalog tables if they are not there yet
pub async fn run_init(args: InitArgs) -> Result<()> {
    let db = args.database.connection_manager()?;
    let outcome = initialize_catalog(&db)
        .await
        .context("Error initializing database")?;

    match outcome {
        InitOutcome::Seeded => println!("Catalog created and seeded"),
        InitOutcome::AlreadyInitialized => println!("Catalog already initialized; nothing to do"),
    }
    Ok(())
}
