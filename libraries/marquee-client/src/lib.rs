//! Marquee Client
//!
//! HTTP client and add-form workflow for a movies/series catalog backend.
//!
//! # Features
//!
//! - **Catalog API**: duplicate checks, title suggestions, entity and part creation
//! - **Duplicate guard**: debounced name-only and composite checks that gate submit
//! - **Suggest box**: debounced typeahead with dropdown state
//! - **Add form**: validation and sequential submission of an entity and its parts
//!
//! # Example
//!
//! ```ignore
//! use marquee_client::{AddEntityForm, CatalogClient, ClientConfig, FormSettings};
//! use marquee_core::types::EntityKind;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(ClientConfig::with_token("https://catalog.example.com/api", "token"))?;
//!     let mut form = AddEntityForm::new(Arc::new(client), EntityKind::Movie, &FormSettings::default());
//!
//!     form.set_name("Inception");
//!     form.set_category(Some(1));
//!     form.set_release_year("2010");
//!     form.toggle_genre(3);
//!     form.guard().settled().await;
//!
//!     println!("{:?}", form.submit().await);
//!     Ok(())
//! }
//! ```

mod api;
mod client;
mod debounce;
mod error;
mod form;
mod guard;
mod poster;
mod suggest;
mod types;

#[cfg(test)]
mod testing;

// Re-export main types
pub use api::CatalogApi;
pub use client::CatalogClient;
pub use debounce::{CancelHandle, Debouncer, Ticket};
pub use error::{ClientError, Result};
pub use form::{AddEntityForm, FormPhase, SubmitFailure, SubmitOutcome};
pub use guard::{DuplicateGuard, GuardInput};
pub use poster::{load_poster, MAX_POSTER_BYTES};
pub use suggest::{DismissReason, SuggestBox, SuggestState};
pub use types::{ClientConfig, FormSettings, DEFAULT_REQUEST_TIMEOUT};
