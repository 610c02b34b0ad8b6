//! Catalog domain models with validation at construction
//!
//! User input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod catalog;
pub mod name;
pub mod price;
pub mod validation;

pub use catalog::{Game, GameCategory, GameView, NewGame};
pub use name::CatalogName;
pub use price::{Price, MAX_PRICE_CENTS};
pub use validation::ValidationError;
