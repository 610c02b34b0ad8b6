//! Database layer - connection management, repositories, and seeding
//!
//! - One pool per process, opened once through [`ConnectionManager`]
//! - Listing uses a JOIN - no N+1 queries
//! - Rely on DB constraints (foreign key), no check-then-insert

pub mod pool;
pub mod repos;
pub mod seed;

use std::sync::Arc;

pub use pool::{ping, ConnectionError, ConnectionManager, Connector, PgConnector};
pub use repos::{CatalogRepo, DataError};
pub use seed::{ensure_schema, initialize_catalog, InitOutcome, InitializationError};

use crate::models::{CatalogName, Game, GameCategory, GameView, NewGame};

/// Catalog operations that fetch the shared pool on each call.
///
/// Cheap to clone; every clone shares the same [`ConnectionManager`].
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Arc<ConnectionManager>,
}

impl Catalog {
    pub fn new(db: Arc<ConnectionManager>) -> Self {
        Self { db }
    }

    pub fn connections(&self) -> &Arc<ConnectionManager> {
        &self.db
    }

    pub async fn create_category(&self, name: CatalogName) -> Result<GameCategory, DataError> {
        let pool = self.db.get().await?;
        CatalogRepo::new(&pool).create_category(name).await
    }

    pub async fn create_game(&self, game: NewGame) -> Result<Game, DataError> {
        let pool = self.db.get().await?;
        CatalogRepo::new(&pool).create_game(game).await
    }

    pub async fn list_games(&self) -> Result<Vec<GameView>, DataError> {
        let pool = self.db.get().await?;
        CatalogRepo::new(&pool).list_games().await
    }
}
