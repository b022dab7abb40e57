//! Strongly-typed ID wrappers
//!
//! Transactions are identified by UUIDs; categories and users by the stable
//! integer identifiers the persistence store hands out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier of a transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn-{}", &self.0.to_string()[..8])
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("txn-").unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Macro to generate integer ID newtype wrappers
macro_rules! define_int_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(id: u32) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

define_int_id!(CategoryId, "Stable integer identifier of a category");
define_int_id!(UserId, "Identifier of the user owning a transaction");

impl CategoryId {
    /// The reserved "uncategorized" entry, never charted in category mode
    pub const UNCATEGORIZED: CategoryId = CategoryId(0);

    pub fn is_uncategorized(&self) -> bool {
        *self == Self::UNCATEGORIZED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn test_transaction_id_display_and_parse() {
        let id = TransactionId::new();
        assert!(id.to_string().starts_with("txn-"));

        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_category_id() {
        assert!(CategoryId::new(0).is_uncategorized());
        assert!(!CategoryId::new(3).is_uncategorized());
        assert_eq!("7".parse::<CategoryId>().unwrap(), CategoryId::new(7));
        assert_eq!(serde_json::to_string(&CategoryId::new(7)).unwrap(), "7");
    }
}
