//! Catalog schema creation and seed data
//!
//! Runs once at startup, before the HTTP server binds. The presence of the
//! game with `game_id = 1` is the only signal that seeding already happened.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::{CatalogRepo, ConnectionError, ConnectionManager, DataError};
use crate::models::{CatalogName, NewGame, Price};

/// Game id the idempotency probe looks for
pub const PROBE_GAME_ID: i32 = 1;

/// Seed categories, inserted in order
pub const SEED_CATEGORIES: [&str; 2] = ["Exploration", "Shooter"];

/// Seed game: name, category (by seed name), release date, price in cents
#[derive(Debug, Clone, Copy)]
pub struct SeedGame {
    pub name: &'static str,
    pub category: &'static str,
    pub release_date: &'static str,
    pub price_cents: i32,
}

pub const SEED_GAMES: [SeedGame; 2] = [
    SeedGame {
        name: "Minecraft",
        category: "Exploration",
        release_date: "2011-01-01",
        price_cents: 2695,
    },
    SeedGame {
        name: "Counter Strike",
        category: "Shooter",
        release_date: "1999-01-01",
        price_cents: 1499,
    },
];

/// What the initializer did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Probe row found; nothing was touched
    AlreadyInitialized,
    /// Tables ensured and seed rows inserted
    Seeded,
}

/// Schema/seed failure. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum InitializationError {
    #[error("error creating database connection: {0}")]
    Connection(#[from] ConnectionError),

    #[error("error creating {table} table: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("error creating {what}: {source}")]
    Seed {
        what: String,
        #[source]
        source: DataError,
    },

    #[error("invalid seed data for {what}: {reason}")]
    SeedData { what: &'static str, reason: String },
}

/// Ensure the schema exists and seed it on first run.
///
/// # Errors
///
/// Connection, table creation and seed insert failures all abort; a partial
/// seed is not rolled back.
pub async fn initialize_catalog(
    db: &ConnectionManager,
) -> Result<InitOutcome, InitializationError> {
    let pool = db.get().await?;

    if probe(&pool).await {
        tracing::info!("Games table already exists. Skipping initialization.");
        return Ok(InitOutcome::AlreadyInitialized);
    }

    ensure_schema(&pool).await?;
    seed(&pool).await?;

    tracing::info!("Database initialized.");
    Ok(InitOutcome::Seeded)
}

/// True when the probe game row exists.
///
/// A missing table reads the same as a missing row.
async fn probe(pool: &PgPool) -> bool {
    let result: Result<Option<(String,)>, sqlx::Error> = sqlx::query_as(
        r#"
        SELECT name
        FROM Games
        WHERE game_id = $1
        "#,
    )
    .bind(PROBE_GAME_ID)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some((name,))) => {
            tracing::debug!(game_id = PROBE_GAME_ID, %name, "Probe row found");
            true
        }
        Ok(None) => false,
        Err(err) => {
            tracing::debug!(error = %err, "Probe query failed; treating catalog as uninitialized");
            false
        }
    }
}

/// Create both catalog tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), InitializationError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS GameCategories (
            category_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|source| InitializationError::Schema {
        table: "categories",
        source,
    })?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Games (
            game_id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            category_id INTEGER REFERENCES GameCategories(category_id),
            release_date DATE NOT NULL,
            price DECIMAL(5,2) NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|source| InitializationError::Schema {
        table: "games",
        source,
    })?;

    Ok(())
}

async fn seed(pool: &PgPool) -> Result<(), InitializationError> {
    let repo = CatalogRepo::new(pool);

    let mut categories = Vec::with_capacity(SEED_CATEGORIES.len());
    for name in SEED_CATEGORIES {
        let category = repo
            .create_category(seed_name(CatalogName::category(name), "category")?)
            .await
            .map_err(|source| InitializationError::Seed {
                what: format!("{} game category", name.to_lowercase()),
                source,
            })?;
        categories.push(category);
    }

    for entry in SEED_GAMES {
        let category_id = categories
            .iter()
            .find(|c| c.name == entry.category)
            .map(|c| c.category_id)
            .ok_or_else(|| InitializationError::SeedData {
                what: "game",
                reason: format!("{} references unknown category {}", entry.name, entry.category),
            })?;

        let game = NewGame {
            name: seed_name(CatalogName::game(entry.name), "game")?,
            category_id,
            release_date: NaiveDate::parse_from_str(entry.release_date, "%Y-%m-%d").map_err(
                |e| InitializationError::SeedData {
                    what: "release date",
                    reason: e.to_string(),
                },
            )?,
            price: Price::from_cents(entry.price_cents).map_err(|e| {
                InitializationError::SeedData {
                    what: "price",
                    reason: e.to_string(),
                }
            })?,
        };

        repo.create_game(game)
            .await
            .map_err(|source| InitializationError::Seed {
                what: format!("{} game", entry.name),
                source,
            })?;
    }

    Ok(())
}

fn seed_name(
    name: Result<CatalogName, crate::models::ValidationError>,
    what: &'static str,
) -> Result<CatalogName, InitializationError> {
    name.map_err(|e| InitializationError::SeedData {
        what,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_games_reference_seed_categories() {
        for game in SEED_GAMES {
            assert!(
                SEED_CATEGORIES.contains(&game.category),
                "{} has no seed category",
                game.name
            );
            assert!(NaiveDate::parse_from_str(game.release_date, "%Y-%m-%d").is_ok());
            assert!(Price::from_cents(game.price_cents).is_ok());
        }
    }

    #[test]
    fn probe_targets_first_seed_game() {
        assert_eq!(PROBE_GAME_ID, 1);
        assert_eq!(SEED_GAMES[0].name, "Minecraft");
    }

    #[test]
    fn error_messages() {
        let err = InitializationError::Schema {
            table: "games",
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().starts_with("error creating games table: "));

        let err = InitializationError::Seed {
            what: "Counter Strike game".into(),
            source: DataError::UnknownCategory(2),
        };
        assert_eq!(
            err.to_string(),
            "error creating Counter Strike game: game category 2 does not exist"
        );
    }

    #[tokio::test]
    async fn connection_failure_aborts() {
        use crate::config::{DatabaseSettings, DatabaseTarget};

        let db = ConnectionManager::postgres(DatabaseSettings::new(DatabaseTarget::Url(
            "not a url".into(),
        )));
        let err = initialize_catalog(&db).await.unwrap_err();
        assert!(matches!(err, InitializationError::Connection(_)));
    }
}
