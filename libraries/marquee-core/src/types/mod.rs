mod draft;
mod entity;
mod wire;

pub use draft::{DraftEntity, PartDraft};
pub use entity::{CategoryId, EntityId, EntityKind, GenreId};
pub use wire::{
    ApiErrorBody, CreateEntity, CreatePart, CreatedEntity, DuplicateCheckResult, DuplicateQuery,
    DuplicateResponse, NextNumberResponse,
};
