//! Entity kinds and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned entity identifier
pub type EntityId = i64;
/// Category identifier
pub type CategoryId = i64;
/// Genre identifier
pub type GenreId = i64;

/// Kind of catalog entity handled by an add form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A movie; extra entries are numbered parts
    Movie,
    /// A series; extra entries are numbered seasons
    Series,
}

impl EntityKind {
    /// Collection path segment on the backend
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movies",
            EntityKind::Series => "series",
        }
    }

    /// Path segment for child records (parts or seasons)
    pub fn children(&self) -> &'static str {
        match self {
            EntityKind::Movie => "parts",
            EntityKind::Series => "seasons",
        }
    }

    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Series => "series",
        }
    }

    /// Label for a single child record
    pub fn child_label(&self) -> &'static str {
        match self {
            EntityKind::Movie => "part",
            EntityKind::Series => "season",
        }
    }

    /// Whether a release year must be supplied
    pub fn requires_year(&self) -> bool {
        matches!(self, EntityKind::Movie)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
