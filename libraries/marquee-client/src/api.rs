//! The backend operations the add-form controls depend on.

use crate::error::Result;
use async_trait::async_trait;
use marquee_core::types::{CreateEntity, CreatePart, CreatedEntity, DuplicateQuery, EntityKind};

/// Catalog backend seam.
///
/// `CatalogClient` implements this over HTTP; the guard, suggest box and
/// add form only see the trait so they can run against any backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Ask whether an entity matching `query` already exists.
    async fn check_duplicate(&self, kind: EntityKind, query: &DuplicateQuery) -> Result<bool>;

    /// Fetch up to `limit` titles matching `query`.
    async fn suggest(&self, kind: EntityKind, query: &str, limit: u32) -> Result<Vec<String>>;

    /// Create the parent entity.
    async fn create_entity(&self, kind: EntityKind, body: &CreateEntity) -> Result<CreatedEntity>;

    /// Create one extra part or season.
    async fn create_part(&self, kind: EntityKind, body: &CreatePart) -> Result<()>;

    /// Number the backend will assign to the next entity of this kind.
    async fn next_number(&self, kind: EntityKind) -> Result<i64>;
}
