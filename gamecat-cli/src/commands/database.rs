//! Database connection arguments shared by every subcommand

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;

use gamecat_server::{ConnectionManager, DatabaseSettings, DatabaseTarget};

/// Connection settings: a full URL, or the five POSTGRES_* components
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Full database URL (takes precedence over the component settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database user
    #[arg(long, env = "POSTGRES_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "POSTGRES_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database host
    #[arg(long, env = "POSTGRES_HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "POSTGRES_PORT")]
    pub db_port: Option<u16>,

    /// Database name
    #[arg(long, env = "POSTGRES_DB")]
    pub db_name: Option<String>,

    /// Maximum pooled connections
    #[arg(
        long,
        env = "GAMECAT_DB_MAX_CONNECTIONS",
        default_value_t = gamecat_server::config::DEFAULT_MAX_CONNECTIONS
    )]
    pub db_max_connections: u32,
}

impl DatabaseArgs {
    /// Resolve into settings. Components are only checked for presence.
    pub fn settings(&self) -> Result<DatabaseSettings> {
        let target = match &self.database_url {
            Some(url) if !url.is_empty() => DatabaseTarget::Url(url.clone()),
            _ => {
                let missing: Vec<&str> = [
                    ("POSTGRES_USER", self.db_user.is_none()),
                    ("POSTGRES_PASSWORD", self.db_password.is_none()),
                    ("POSTGRES_HOST", self.db_host.is_none()),
                    ("POSTGRES_PORT", self.db_port.is_none()),
                    ("POSTGRES_DB", self.db_name.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();

                if !missing.is_empty() {
                    bail!(
                        "database not configured: set DATABASE_URL or {} (flags, environment, or .env)",
                        missing.join(", ")
                    );
                }

                DatabaseTarget::Parts {
                    user: self.db_user.clone().unwrap_or_default(),
                    password: self.db_password.clone().unwrap_or_default(),
                    host: self.db_host.clone().unwrap_or_default(),
                    port: self.db_port.unwrap_or_default(),
                    database: self.db_name.clone().unwrap_or_default(),
                }
            }
        };

        Ok(DatabaseSettings::new(target).with_max_connections(self.db_max_connections))
    }

    /// Build the process-wide connection manager. Nothing connects yet.
    pub fn connection_manager(&self) -> Result<Arc<ConnectionManager>> {
        let settings = self.settings()?;
        tracing::debug!(target_db = %settings.display_target(), "Database settings resolved");
        Ok(Arc::new(ConnectionManager::postgres(settings)))
    }
}
