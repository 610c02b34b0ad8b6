//! Catalog name validation
//!
//! Category and game names share the same column shape: `VARCHAR(255) NOT NULL`.

use std::fmt;

use super::ValidationError;

/// Maximum length for catalog names, in characters
const MAX_NAME_LEN: usize = 255;

/// Validated display name for a category or a game
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogName(String);

impl CatalogName {
    /// Create a new name, trimming surrounding whitespace.
    ///
    /// `field` names the value in error messages ("category name", "game name").
    ///
    /// # Example
    /// ```
    /// use gamecat_server::models::CatalogName;
    ///
    /// assert_eq!(CatalogName::new("game name", "  Minecraft ").unwrap().as_str(), "Minecraft");
    /// assert!(CatalogName::new("game name", "   ").is_err());
    /// ```
    pub fn new(field: &'static str, s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field,
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Shorthand for a category name.
    pub fn category(s: &str) -> Result<Self, ValidationError> {
        Self::new("category name", s)
    }

    /// Shorthand for a game name.
    pub fn game(s: &str) -> Result<Self, ValidationError> {
        Self::new("game name", s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CatalogName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
