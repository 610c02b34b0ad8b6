//! Catalog repository
//!
//! Single-statement operations against the shared pool:
//! - create_category / create_game: INSERT ... RETURNING id
//! - list_games: inner JOIN for the category name (no N+1)
//!
//! Prices cross the wire as integer cents so `DECIMAL(5,2)` never goes
//! through a float.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};

use super::DataError;
use crate::models::{CatalogName, Game, GameCategory, GameView, NewGame, Price};

/// Listing row as returned by the join
#[derive(Debug, FromRow)]
struct GameViewRow {
    game_id: i32,
    name: String,
    category: String,
    release_date: NaiveDate,
    price_cents: i32,
}

impl From<GameViewRow> for GameView {
    fn from(row: GameViewRow) -> Self {
        Self {
            game_id: row.game_id,
            name: row.name,
            category: row.category,
            release_date: row.release_date,
            price: Price::from_stored_cents(row.price_cents),
        }
    }
}

/// Catalog repository
pub struct CatalogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a category and return it with its assigned id.
    pub async fn create_category(&self, name: CatalogName) -> Result<GameCategory, DataError> {
        let (category_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO GameCategories (name)
            VALUES ($1)
            RETURNING category_id
            "#,
        )
        .bind(name.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| DataError::query("inserting game category", e))?;

        let category = GameCategory {
            category_id,
            name: name.into_string(),
        };

        tracing::info!(
            category_id = category.category_id,
            name = %category.name,
            "Game category created"
        );
        Ok(category)
    }

    /// Insert a game referencing an existing category.
    ///
    /// A missing category surfaces as [`DataError::UnknownCategory`].
    pub async fn create_game(&self, game: NewGame) -> Result<Game, DataError> {
        let result: Result<(i32,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO Games (name, category_id, release_date, price)
            VALUES ($1, $2, $3, $4::INT4 / 100.0)
            RETURNING game_id
            "#,
        )
        .bind(game.name.as_str())
        .bind(game.category_id)
        .bind(game.release_date)
        .bind(game.price.cents())
        .fetch_one(self.pool)
        .await;

        let (game_id,) = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(DataError::UnknownCategory(game.category_id));
            }
            Err(e) => return Err(DataError::query("inserting game", e)),
        };

        let game = Game {
            game_id,
            name: game.name.into_string(),
            category_id: game.category_id,
            release_date: game.release_date,
            price: game.price,
        };

        tracing::info!(
            game_id = game.game_id,
            name = %game.name,
            category_id = game.category_id,
            release_date = %game.release_date,
            price = %game.price,
            "Game created"
        );
        Ok(game)
    }

    /// List every game with its category name.
    ///
    /// No ORDER BY: rows come back in whatever order the planner picks.
    pub async fn list_games(&self) -> Result<Vec<GameView>, DataError> {
        let rows: Vec<GameViewRow> = sqlx::query_as(
            r#"
            SELECT
                g.game_id,
                g.name,
                gc.name AS category,
                g.release_date,
                (g.price * 100)::INT4 AS price_cents
            FROM Games g
            JOIN GameCategories gc ON g.category_id = gc.category_id
            "#,
        )
        .fetch_all(self.pool)
        .await
        .map_err(|e| DataError::query("querying games", e))?;

        Ok(rows.into_iter().map(GameView::from).collect())
    }
}
