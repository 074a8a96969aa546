//! Speculative duplicate detection for add forms.
//!
//! The guard runs two independent debounced checks against the backend:
//! a name-only check that follows every name change, and a composite
//! check keyed on name, category, year and optional subcategory that runs
//! only once all of its required fields are present. Both fail open: an
//! error resolves to "not a duplicate" because the backend repeats the
//! check when the entity is written.

use crate::api::CatalogApi;
use crate::debounce::Debouncer;
use marquee_core::types::{CategoryId, DraftEntity, DuplicateCheckResult, DuplicateQuery, EntityKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Fields the guard reacts to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardInput {
    pub name: String,
    pub category_id: Option<CategoryId>,
    /// Parsed year; `None` when empty or invalid
    pub year: Option<i32>,
    pub subcategory_id: Option<CategoryId>,
}

impl GuardInput {
    /// Name-only input
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Extract the guarded fields from a draft
    pub fn from_draft(draft: &DraftEntity) -> Self {
        Self {
            name: draft.name.clone(),
            category_id: draft.category_id,
            year: draft.year(),
            subcategory_id: draft.subcategory_id,
        }
    }

    fn name_query(&self) -> Option<DuplicateQuery> {
        let name = self.name.trim();
        (!name.is_empty()).then(|| DuplicateQuery::name_only(name))
    }

    fn composite_query(&self) -> Option<DuplicateQuery> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let category_id = self.category_id?;
        let year = self.year?;
        Some(DuplicateQuery::composite(
            name,
            category_id,
            year,
            self.subcategory_id,
        ))
    }
}

/// One debounced check and the state it publishes.
struct CheckChannel {
    label: &'static str,
    debouncer: Debouncer,
    state: Arc<watch::Sender<DuplicateCheckResult>>,
    last_query: Option<DuplicateQuery>,
}

impl CheckChannel {
    fn new(label: &'static str, delay: Duration) -> Self {
        let (state, _) = watch::channel(DuplicateCheckResult::CLEAR);
        Self {
            label,
            debouncer: Debouncer::new(delay),
            state: Arc::new(state),
            last_query: None,
        }
    }

    fn current(&self) -> DuplicateCheckResult {
        *self.state.borrow()
    }

    fn update(&mut self, api: &Arc<dyn CatalogApi>, kind: EntityKind, query: Option<DuplicateQuery>) {
        if self.last_query == query {
            return;
        }
        self.last_query.clone_from(&query);

        let Some(query) = query else {
            self.debouncer.cancel();
            self.state.send_replace(DuplicateCheckResult::CLEAR);
            return;
        };

        // Retire the previous ticket before publishing LOADING
        self.debouncer.cancel();
        self.state.send_replace(DuplicateCheckResult::LOADING);

        let api = Arc::clone(api);
        let state = Arc::clone(&self.state);
        let label = self.label;

        self.debouncer.schedule(move |ticket| async move {
            let result = match api.check_duplicate(kind, &query).await {
                Ok(duplicate) => {
                    debug!(check = label, name = %query.name, duplicate, "Duplicate check resolved");
                    DuplicateCheckResult::settled(duplicate)
                }
                Err(e) => {
                    warn!(
                        check = label,
                        name = %query.name,
                        error = %e,
                        "Duplicate check failed, treating as not a duplicate"
                    );
                    DuplicateCheckResult::CLEAR
                }
            };

            state.send_if_modified(|current| {
                if !ticket.is_current() {
                    debug!(check = label, name = %query.name, "Discarding stale duplicate check");
                    return false;
                }
                let changed = *current != result;
                *current = result;
                changed
            });
        });
    }

    fn reset(&mut self) {
        self.debouncer.cancel();
        self.last_query = None;
        self.state.send_replace(DuplicateCheckResult::CLEAR);
    }
}

/// Debounced name-only and composite duplicate checks.
///
/// Feed it with [`DuplicateGuard::update`] on every edit; read the flags
/// synchronously or subscribe to them. Dropping the guard cancels any
/// pending or in-flight check.
pub struct DuplicateGuard {
    api: Arc<dyn CatalogApi>,
    kind: EntityKind,
    name: CheckChannel,
    composite: CheckChannel,
}

impl DuplicateGuard {
    /// Create a guard for one form.
    pub fn new(api: Arc<dyn CatalogApi>, kind: EntityKind, debounce: Duration) -> Self {
        Self {
            api,
            kind,
            name: CheckChannel::new("name", debounce),
            composite: CheckChannel::new("composite", debounce),
        }
    }

    /// Entity kind being guarded
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// React to edited fields.
    ///
    /// Each check is rescheduled only when its own inputs changed, so
    /// editing the category does not re-run the name-only check. A blank
    /// name, or missing composite fields, settle the affected check to
    /// "not a duplicate" immediately without a request.
    pub fn update(&mut self, input: &GuardInput) {
        self.name
            .update(&self.api, self.kind, input.name_query());
        self.composite
            .update(&self.api, self.kind, input.composite_query());
    }

    /// Current name-only check state
    pub fn name_check(&self) -> DuplicateCheckResult {
        self.name.current()
    }

    /// Current composite check state
    pub fn composite_check(&self) -> DuplicateCheckResult {
        self.composite.current()
    }

    /// Watch the name-only check
    pub fn subscribe_name(&self) -> watch::Receiver<DuplicateCheckResult> {
        self.name.state.subscribe()
    }

    /// Watch the composite check
    pub fn subscribe_composite(&self) -> watch::Receiver<DuplicateCheckResult> {
        self.composite.state.subscribe()
    }

    /// Whether either check is still pending
    pub fn is_loading(&self) -> bool {
        self.name_check().loading || self.composite_check().loading
    }

    /// Whether submission must be blocked right now
    pub fn blocks_submit(&self) -> bool {
        self.name_check().duplicate || self.composite_check().duplicate
    }

    /// Wait until neither check is pending and return both results.
    pub async fn settled(&self) -> (DuplicateCheckResult, DuplicateCheckResult) {
        let mut name_rx = self.subscribe_name();
        let mut composite_rx = self.subscribe_composite();

        let name = match name_rx.wait_for(|r| !r.loading).await {
            Ok(result) => *result,
            Err(_) => self.name_check(),
        };
        let composite = match composite_rx.wait_for(|r| !r.loading).await {
            Ok(result) => *result,
            Err(_) => self.composite_check(),
        };

        (name, composite)
    }

    /// Cancel pending work and clear both checks.
    pub fn reset(&mut self) {
        self.name.reset();
        self.composite.reset();
    }
}
