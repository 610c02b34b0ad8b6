//! gamecat CLI - game catalog service
//!
//! Entry point for the catalog HTTP service and its maintenance commands:
//! - `serve`: initialize the catalog, then serve `GET /` and `GET /games`
//! - `init`: create and seed the catalog tables only
//! - `category` / `game`: add rows and list the catalog
//!
//! Configuration comes from flags, the environment, and an optional `.env`
//! in the working directory.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "gamecat",
    author,
    version,
    about = "Game catalog service backed by PostgreSQL"
)]
struct Cli {
    /// Debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the catalog and run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Create and seed the catalog tables if needed
    Init(commands::init::InitArgs),
    /// Manage game categories
    Category(commands::catalog::CategoryArgs),
    /// Manage and list games
    Game(commands::catalog::GameArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; real environment wins over it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Init(args) => commands::run_init(args).await?,
        Commands::Category(args) => commands::run_category(args).await?,
        Commands::Game(args) => commands::run_game(args).await?,
    }

    Ok(())
}
