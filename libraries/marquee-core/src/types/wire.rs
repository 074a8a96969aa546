//! Request and response bodies exchanged with the catalog backend

use crate::types::entity::{CategoryId, EntityId, GenreId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Duplicate Check
// =============================================================================

/// Parameters of a duplicate-check query.
///
/// With only `name` set this is the name-only check; with category and
/// year set it is the composite check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateQuery {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<CategoryId>,
}

impl DuplicateQuery {
    /// Name-only query
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_id: None,
            release_year: None,
            subcategory_id: None,
        }
    }

    /// Composite query keyed on name, category, year and optional subcategory
    pub fn composite(
        name: impl Into<String>,
        category_id: CategoryId,
        release_year: i32,
        subcategory_id: Option<CategoryId>,
    ) -> Self {
        Self {
            name: name.into(),
            category_id: Some(category_id),
            release_year: Some(release_year),
            subcategory_id,
        }
    }

    /// Whether this query carries composite fields
    pub fn is_composite(&self) -> bool {
        self.category_id.is_some()
    }
}

/// Response from the duplicate-check endpoint.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DuplicateResponse {
    pub duplicate: bool,
}

/// Observable state of one duplicate check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateCheckResult {
    /// A check is scheduled or in flight
    pub loading: bool,
    /// The backend reported an existing entity
    pub duplicate: bool,
}

impl DuplicateCheckResult {
    /// Settled, not a duplicate
    pub const CLEAR: Self = Self {
        loading: false,
        duplicate: false,
    };

    /// Check pending
    pub const LOADING: Self = Self {
        loading: true,
        duplicate: false,
    };

    /// Settled with the given answer
    pub fn settled(duplicate: bool) -> Self {
        Self {
            loading: false,
            duplicate,
        }
    }
}

// =============================================================================
// Create
// =============================================================================

/// Body of `POST /<entity>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntity {
    pub name: String,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    pub genre_ids: Vec<GenreId>,
    pub is_watched: bool,
}

/// Response from `POST /<entity>`. Only `id` is interpreted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatedEntity {
    pub id: EntityId,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Body of `POST /<entity>/parts` or `/seasons`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePart {
    pub parent_id: EntityId,
    pub number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// Response from `GET /<entity>/next-number`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct NextNumberResponse {
    pub next_number: i64,
}

// =============================================================================
// Error Types
// =============================================================================

/// Error body returned by the backend on rejected writes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
