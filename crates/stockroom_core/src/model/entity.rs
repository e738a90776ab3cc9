//! Entity kinds addressed by name through the gateway.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-assigned record identifier.
pub type RecordId = i64;

/// The record types exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Category,
    Book,
    Grocery,
}

impl EntityKind {
    /// Every registered entity kind, in registry order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Category, EntityKind::Book, EntityKind::Grocery];

    /// Canonical entity name (`Category|Book|Grocery`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Book => "Book",
            Self::Grocery => "Grocery",
        }
    }

    /// Plural form used in operation names, e.g. `allGroceries`.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Category => "Categories",
            Self::Book => "Books",
            Self::Grocery => "Groceries",
        }
    }

    /// Backing SQLite table.
    pub fn table(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Book => "books",
            Self::Grocery => "groceries",
        }
    }

    /// Resolves a caller-supplied entity name.
    ///
    /// Matches the canonical name or the table name, ignoring ASCII case and
    /// surrounding whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL.into_iter().find(|kind| {
            trimmed.eq_ignore_ascii_case(kind.name()) || trimmed.eq_ignore_ascii_case(kind.table())
        })
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
