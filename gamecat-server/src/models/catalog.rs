//! Catalog records: categories, games and the joined listing row

use chrono::NaiveDate;
use serde::Serialize;

use super::{CatalogName, Price};

/// A game category as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameCategory {
    pub category_id: i32,
    pub name: String,
}

/// A game as stored, referencing its category by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub game_id: i32,
    pub name: String,
    pub category_id: i32,
    pub release_date: NaiveDate,
    pub price: Price,
}

/// Input for inserting a game
#[derive(Debug, Clone)]
pub struct NewGame {
    pub name: CatalogName,
    pub category_id: i32,
    pub release_date: NaiveDate,
    pub price: Price,
}

/// Listing row: a game with its category display name joined in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub game_id: i32,
    pub name: String,
    pub category: String,
    /// Serialized as `YYYY-MM-DD`
    pub release_date: NaiveDate,
    pub price: Price,
}
