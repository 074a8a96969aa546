//! Marquee Core
//!
//! Platform-agnostic domain types, validation, and error handling for the
//! Marquee movies/series catalog client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `EntityKind`, `DraftEntity`, `PartDraft`
//! - **Wire Types**: request/response bodies shared with the catalog backend
//! - **Validation**: year parsing and whole-draft checks run before submit
//! - **Error Handling**: Unified `CatalogError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use marquee_core::types::{DraftEntity, EntityKind};
//! use marquee_core::validation::validate_draft;
//!
//! let mut draft = DraftEntity::new(EntityKind::Movie);
//! draft.name = "Inception".to_string();
//! draft.category_id = Some(1);
//! draft.release_year = "2010".to_string();
//! draft.genre_ids.insert(4);
//!
//! assert!(validate_draft(&draft).is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{CatalogError, Result};
pub use types::{
    ApiErrorBody, CategoryId, CreateEntity, CreatePart, CreatedEntity, DraftEntity,
    DuplicateCheckResult, DuplicateQuery, DuplicateResponse, EntityId, EntityKind, GenreId,
    NextNumberResponse, PartDraft,
};
pub use validation::{
    check_draft, parse_year, validate_draft, ValidationProblem, MAX_YEAR, MIN_PART_NUMBER, MIN_YEAR,
};
