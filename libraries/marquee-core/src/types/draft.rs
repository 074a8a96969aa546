//! In-memory drafts held by add forms

use crate::types::entity::{CategoryId, EntityKind, GenreId};
use crate::types::wire::CreateEntity;
use crate::validation::parse_year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An extra part (movies) or season (series) entered on the form.
///
/// Number 1 is implicit and assigned by the server, so extra entries
/// start at 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDraft {
    /// Part/season number as typed
    pub number: u32,

    /// Release year as typed (may be empty)
    pub year: String,
}

impl PartDraft {
    /// Create a new part draft
    pub fn new(number: u32, year: impl Into<String>) -> Self {
        Self {
            number,
            year: year.into(),
        }
    }

    /// Parsed year, if one was typed and it is valid
    pub fn parsed_year(&self) -> Option<i32> {
        parse_year(&self.year)
    }
}

/// Not-yet-persisted movie or series state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEntity {
    /// Which kind of entity this draft creates
    pub kind: EntityKind,

    /// Title as typed
    pub name: String,

    /// Selected category
    pub category_id: Option<CategoryId>,

    /// Selected subcategory
    pub subcategory_id: Option<CategoryId>,

    /// Release year as typed
    pub release_year: String,

    /// Selected genres
    pub genre_ids: BTreeSet<GenreId>,

    /// Whether the entity was already watched
    pub is_watched: bool,

    /// Poster encoded as a `data:` URI
    pub poster_data_uri: Option<String>,

    /// Extra parts or seasons, in entry order
    pub parts: Vec<PartDraft>,
}

impl DraftEntity {
    /// Create an empty draft
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            name: String::new(),
            category_id: None,
            subcategory_id: None,
            release_year: String::new(),
            genre_ids: BTreeSet::new(),
            is_watched: false,
            poster_data_uri: None,
            parts: Vec::new(),
        }
    }

    /// Reset to an empty draft of the same kind
    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Trimmed name
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    /// Parsed release year, if valid
    pub fn year(&self) -> Option<i32> {
        parse_year(&self.release_year)
    }

    /// Add or remove a genre
    pub fn toggle_genre(&mut self, genre_id: GenreId) {
        if !self.genre_ids.remove(&genre_id) {
            self.genre_ids.insert(genre_id);
        }
    }

    /// Build the create request body.
    ///
    /// Call only after the draft passed validation; invalid optional
    /// fields are simply omitted.
    pub fn to_create_request(&self) -> CreateEntity {
        CreateEntity {
            name: self.trimmed_name().to_string(),
            category_id: self.category_id.unwrap_or_default(),
            subcategory_id: self.subcategory_id,
            release_year: self.year(),
            poster_url: self.poster_data_uri.clone(),
            genre_ids: self.genre_ids.iter().copied().collect(),
            is_watched: self.is_watched,
        }
    }
}
