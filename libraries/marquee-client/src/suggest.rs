//! Typeahead suggestions for the name field.

use crate::api::CatalogApi;
use crate::debounce::Debouncer;
use crate::types::FormSettings;
use marquee_core::types::EntityKind;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Published state of the suggestion dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestState {
    /// Query as last typed
    pub query: String,
    /// Titles from the last completed fetch, at most the configured limit
    pub suggestions: Vec<String>,
    /// Whether the dropdown is shown
    pub open: bool,
    /// A fetch is scheduled or in flight
    pub loading: bool,
}

/// Why the dropdown was closed without a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    OutsideClick,
}

/// Debounced title suggestions.
pub struct SuggestBox {
    api: Arc<dyn CatalogApi>,
    kind: EntityKind,
    debouncer: Debouncer,
    state: Arc<watch::Sender<SuggestState>>,
    limit: u32,
    min_chars: usize,
}

impl SuggestBox {
    /// Create a suggest box for one form.
    pub fn new(api: Arc<dyn CatalogApi>, kind: EntityKind, settings: &FormSettings) -> Self {
        let (state, _) = watch::channel(SuggestState::default());
        Self {
            api,
            kind,
            debouncer: Debouncer::new(settings.suggest_debounce),
            state: Arc::new(state),
            limit: settings.suggest_limit,
            min_chars: settings.suggest_min_chars,
        }
    }

    /// Current dropdown state
    pub fn state(&self) -> SuggestState {
        self.state.borrow().clone()
    }

    /// Watch the dropdown state
    pub fn subscribe(&self) -> watch::Receiver<SuggestState> {
        self.state.subscribe()
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.state.borrow().suggestions.clone()
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    /// React to the name field changing.
    ///
    /// Queries shorter than the minimum (after trimming) clear and close
    /// the dropdown at once; anything longer is fetched after the
    /// debounce.
    pub fn set_query(&mut self, query: &str) {
        let trimmed = query.trim().to_string();

        if trimmed.chars().count() < self.min_chars {
            self.debouncer.cancel();
            self.state.send_replace(SuggestState {
                query: query.to_string(),
                ..SuggestState::default()
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query = query.to_string();
            state.loading = true;
        });

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let kind = self.kind;
        let limit = self.limit;

        self.debouncer.schedule(move |ticket| async move {
            let titles = match api.suggest(kind, &trimmed, limit).await {
                Ok(mut titles) => {
                    titles.truncate(limit as usize);
                    titles
                }
                Err(e) => {
                    warn!(query = %trimmed, error = %e, "Suggest request failed");
                    Vec::new()
                }
            };

            state.send_if_modified(|current| {
                if !ticket.is_current() {
                    return false;
                }
                debug!(query = %trimmed, results = titles.len(), "Suggestions updated");
                current.open = !titles.is_empty();
                current.suggestions = titles;
                current.loading = false;
                true
            });
        });
    }

    /// Pick the suggestion at `index`.
    ///
    /// Returns the chosen title for the caller to write into the name
    /// field, and closes the dropdown. Out-of-range indices change nothing.
    pub fn select(&mut self, index: usize) -> Option<String> {
        let choice = self.state.borrow().suggestions.get(index).cloned()?;

        self.debouncer.cancel();
        self.state.send_replace(SuggestState {
            query: choice.clone(),
            ..SuggestState::default()
        });

        debug!(title = %choice, "Suggestion selected");
        Some(choice)
    }

    /// Close the dropdown without selecting.
    ///
    /// A fetch still pending is cancelled so it cannot reopen the dropdown
    /// before the next edit.
    pub fn dismiss(&mut self, reason: DismissReason) {
        self.debouncer.cancel();
        self.state.send_if_modified(|state| {
            let changed = state.open || state.loading;
            state.open = false;
            state.loading = false;
            changed
        });
        debug!(?reason, "Suggestions dismissed");
    }

    /// Cancel pending work and clear everything.
    pub fn reset(&mut self) {
        self.debouncer.cancel();
        self.state.send_replace(SuggestState::default());
    }
}
