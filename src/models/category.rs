//! Category model
//!
//! Categories are a flat, ordered list with stable integer identifiers. The
//! entry with id 0 is the reserved "uncategorized" bucket.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// A transaction category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier
    pub id: CategoryId,

    /// Display name
    pub name: String,
}

impl Category {
    /// Create a new category
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
        }
    }

    /// The reserved entry transactions fall into when no category is chosen
    pub fn uncategorized() -> Self {
        Self {
            id: CategoryId::UNCATEGORIZED,
            name: "None".to_string(),
        }
    }

    /// Whether this category gets its own chart bucket pair
    pub fn is_chartable(&self) -> bool {
        !self.id.is_uncategorized()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

/// Keep the uncategorized entry present exactly once, at the front
///
/// The reserved entry is recognised by id 0 only; any other entry, first or
/// not, is an ordinary category.
pub fn with_uncategorized(mut categories: Vec<Category>) -> Vec<Category> {
    categories.retain(|c| !c.id.is_uncategorized());
    categories.insert(0, Category::uncategorized());
    categories
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
