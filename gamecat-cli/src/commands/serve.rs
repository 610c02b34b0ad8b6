//! HTTP server command
//!
//! Initializes the catalog, then serves it until Ctrl+C/SIGTERM.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::Parser;

use gamecat_server::http::server::DEFAULT_TAG;
use gamecat_server::{initialize_catalog, run_server, Catalog, ServerConfig};

use super::database::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "GAMECAT_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Build/version tag reported by the health check
    #[arg(long, env = "TAG", default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Allowed CORS origin (repeatable). Default: any origin
    #[arg(long = "cors-origin", env = "GAMECAT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db = args.database.connection_manager()?;

    // A catalog that failed to initialize must not be served
    let outcome = initialize_catalog(&db)
        .await
        .context("Error initializing database")?;
    tracing::info!(?outcome, "Catalog ready");

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        tag: args.tag,
        cors_origins: args.cors_origins,
    };

    tracing::info!("Starting gamecat server on {}", config.bind_addr);
    run_server(Catalog::new(db), config)
        .await
        .context("Error starting server")?;

    Ok(())
}
