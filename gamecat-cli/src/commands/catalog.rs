//! Category and game commands
//!
//! Thin wrappers over the catalog store for local inspection and data entry.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use gamecat_server::models::{CatalogName, GameView, NewGame, Price};
use gamecat_server::Catalog;

use super::database::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// Create a game category
    Add {
        /// Display name
        name: String,
    },
}

#[derive(Parser, Debug)]
pub struct GameArgs {
    #[command(subcommand)]
    pub command: GameCommand,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Subcommand, Debug)]
pub enum GameCommand {
    /// Create a game in an existing category
    Add {
        /// Game name
        #[arg(long)]
        name: String,

        /// Id of an existing category
        #[arg(long)]
        category_id: i32,

        /// Release date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        release_date: NaiveDate,

        /// Price with at most two decimals, e.g. 26.95
        #[arg(long, value_parser = parse_price)]
        price: Price,
    },

    /// List games with their category names
    List {
        /// Print JSON (same shape as GET /games)
        #[arg(long)]
        json: bool,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_price(s: &str) -> Result<Price, String> {
    s.parse::<Price>().map_err(|e| e.to_string())
}

pub async fn run_category(args: CategoryArgs) -> Result<()> {
    let catalog = Catalog::new(args.database.connection_manager()?);

    match args.command {
        CategoryCommand::Add { name } => {
            let name = CatalogName::category(&name)?;
            let category = catalog
                .create_category(name)
                .await
                .context("Failed to create category")?;
            println!("{}\t{}", category.category_id, category.name);
        }
    }
    Ok(())
}

pub async fn run_game(args: GameArgs) -> Result<()> {
    let catalog = Catalog::new(args.database.connection_manager()?);

    match args.command {
        GameCommand::Add {
            name,
            category_id,
            release_date,
            price,
        } => {
            let game = catalog
                .create_game(NewGame {
                    name: CatalogName::game(&name)?,
                    category_id,
                    release_date,
                    price,
                })
                .await
                .context("Failed to create game")?;
            println!(
                "{}\t{}\t{}\t{}\t{}",
                game.game_id, game.name, game.category_id, game.release_date, game.price
            );
        }
        GameCommand::List { json } => {
            let games = catalog.list_games().await.context("Failed to list games")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&games)?);
            } else {
                print_table(&games);
            }
        }
    }
    Ok(())
}

fn print_table(games: &[GameView]) {
    if games.is_empty() {
        println!("No games.");
        return;
    }

    let name_width = games.iter().map(|g| g.name.len()).max().unwrap_or(4).max(4);
    let category_width = games
        .iter()
        .map(|g| g.category.len())
        .max()
        .unwrap_or(8)
        .max(8);

    println!(
        "{:>4}  {:<name_width$}  {:<category_width$}  {:<10}  {:>7}",
        "ID", "NAME", "CATEGORY", "RELEASED", "PRICE"
    );
    for game in games {
        println!(
            "{:>4}  {:<name_width$}  {:<category_width$}  {:<10}  {:>7}",
            game.game_id,
            game.name,
            game.category,
            game.release_date.to_string(),
            game.price.to_string()
        );
    }
}
