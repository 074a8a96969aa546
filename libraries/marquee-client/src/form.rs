//! Add-movie / add-series form orchestration.
//!
//! ```text
//! Editing -> Validating -> Submitting -> Success -> Editing
//!                |              \-----> Failed  -> Editing
//!                \-> Editing (rejected locally)
//! ```
//!
//! Submission writes the parent entity and then each extra part or
//! season one request at a time, in draft order. If a child request
//! fails, records already written stay written: there is no compensating
//! delete, and the failure reports exactly which numbers were created.

use crate::api::CatalogApi;
use crate::error::ClientError;
use crate::guard::{DuplicateGuard, GuardInput};
use crate::suggest::{DismissReason, SuggestBox};
use crate::types::FormSettings;
use marquee_core::types::{CategoryId, CreatePart, DraftEntity, EntityId, EntityKind, GenreId, PartDraft};
use marquee_core::validation::{check_draft, parse_year, ValidationProblem};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Where the form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Success,
    Failed,
}

/// Why a submission stopped after reaching the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    /// Message to show the user
    pub message: String,
    /// Parent id, when the parent was created before the failure
    pub parent_id: Option<EntityId>,
    /// Numbers of the parts/seasons created before the failure
    pub parts_created: Vec<u32>,
    /// Number of the part/season whose request failed
    pub failed_part: Option<u32>,
}

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Everything was written; the form has been reset
    Created { id: EntityId, parts_created: Vec<u32> },
    /// Local checks failed; nothing was sent
    Rejected(Vec<ValidationProblem>),
    /// A request failed; the draft is kept for a manual resubmit
    Failed(SubmitFailure),
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }
}

/// One add form: a draft plus its duplicate guard and suggest box.
pub struct AddEntityForm {
    api: Arc<dyn CatalogApi>,
    draft: DraftEntity,
    guard: DuplicateGuard,
    suggest: SuggestBox,
    phase: watch::Sender<FormPhase>,
    next_number: Option<i64>,
}

impl AddEntityForm {
    /// Create an empty form.
    pub fn new(api: Arc<dyn CatalogApi>, kind: EntityKind, settings: &FormSettings) -> Self {
        let (phase, _) = watch::channel(FormPhase::Editing);
        Self {
            guard: DuplicateGuard::new(Arc::clone(&api), kind, settings.duplicate_debounce),
            suggest: SuggestBox::new(Arc::clone(&api), kind, settings),
            api,
            draft: DraftEntity::new(kind),
            phase,
            next_number: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.draft.kind
    }

    pub fn draft(&self) -> &DraftEntity {
        &self.draft
    }

    pub fn guard(&self) -> &DuplicateGuard {
        &self.guard
    }

    pub fn suggest(&self) -> &SuggestBox {
        &self.suggest
    }

    /// Current phase
    pub fn phase(&self) -> FormPhase {
        *self.phase.borrow()
    }

    /// Watch phase transitions
    pub fn subscribe_phase(&self) -> watch::Receiver<FormPhase> {
        self.phase.subscribe()
    }

    /// Last fetched next sequence number
    pub fn next_number(&self) -> Option<i64> {
        self.next_number
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
        self.suggest.set_query(&self.draft.name);
        self.sync_guard();
    }

    /// Write the chosen suggestion into the name field.
    pub fn select_suggestion(&mut self, index: usize) -> Option<String> {
        let title = self.suggest.select(index)?;
        self.draft.name.clone_from(&title);
        self.sync_guard();
        Some(title)
    }

    pub fn dismiss_suggestions(&mut self, reason: DismissReason) {
        self.suggest.dismiss(reason);
    }

    pub fn set_category(&mut self, category_id: Option<CategoryId>) {
        self.draft.category_id = category_id;
        self.sync_guard();
    }

    pub fn set_subcategory(&mut self, subcategory_id: Option<CategoryId>) {
        self.draft.subcategory_id = subcategory_id;
        self.sync_guard();
    }

    pub fn set_release_year(&mut self, input: impl Into<String>) {
        self.draft.release_year = input.into();
        self.sync_guard();
    }

    pub fn toggle_genre(&mut self, genre_id: GenreId) {
        self.draft.toggle_genre(genre_id);
    }

    pub fn set_watched(&mut self, is_watched: bool) {
        self.draft.is_watched = is_watched;
    }

    pub fn set_poster(&mut self, poster_data_uri: Option<String>) {
        self.draft.poster_data_uri = poster_data_uri;
    }

    pub fn add_part(&mut self, part: PartDraft) {
        self.draft.parts.push(part);
    }

    /// Replace the part at `index`; returns false if out of range.
    pub fn update_part(&mut self, index: usize, part: PartDraft) -> bool {
        match self.draft.parts.get_mut(index) {
            Some(slot) => {
                *slot = part;
                true
            }
            None => false,
        }
    }

    pub fn remove_part(&mut self, index: usize) -> Option<PartDraft> {
        (index < self.draft.parts.len()).then(|| self.draft.parts.remove(index))
    }

    /// Whether the typed year is acceptable: valid, or empty where optional.
    pub fn year_ok(&self) -> bool {
        let input = self.draft.release_year.trim();
        if input.is_empty() {
            !self.draft.kind.requires_year()
        } else {
            parse_year(input).is_some()
        }
    }

    /// Whether a submit would pass local checks right now.
    pub fn can_submit(&self) -> bool {
        self.problems().is_empty()
    }

    fn sync_guard(&mut self) {
        self.guard.update(&GuardInput::from_draft(&self.draft));
    }

    fn problems(&self) -> Vec<ValidationProblem> {
        let mut problems = check_draft(&self.draft);
        if self.guard.name_check().duplicate {
            problems.push(ValidationProblem::DuplicateName);
        }
        if self.guard.composite_check().duplicate {
            problems.push(ValidationProblem::DuplicateComposite);
        }
        problems
    }

    // -------------------------------------------------------------------------
    // Submitting
    // -------------------------------------------------------------------------

    /// Refetch the next sequence number.
    ///
    /// Failures are logged and leave the number cleared.
    pub async fn refresh_next_number(&mut self) {
        match self.api.next_number(self.draft.kind).await {
            Ok(number) => {
                debug!(kind = %self.draft.kind, next_number = number, "Next number fetched");
                self.next_number = Some(number);
            }
            Err(e) => {
                warn!(kind = %self.draft.kind, error = %e, "Failed to fetch next number");
                self.next_number = None;
            }
        }
    }

    /// Validate and, if everything passes, write the draft.
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.transition(FormPhase::Validating);

        let problems = self.problems();
        if !problems.is_empty() {
            debug!(problems = problems.len(), "Submit rejected locally");
            self.transition(FormPhase::Editing);
            return SubmitOutcome::Rejected(problems);
        }

        self.transition(FormPhase::Submitting);

        match self.persist().await {
            Ok((id, parts_created)) => {
                self.transition(FormPhase::Success);
                self.draft.reset();
                self.guard.reset();
                self.suggest.reset();
                self.refresh_next_number().await;
                self.transition(FormPhase::Editing);
                SubmitOutcome::Created { id, parts_created }
            }
            Err(failure) => {
                self.transition(FormPhase::Failed);
                self.transition(FormPhase::Editing);
                SubmitOutcome::Failed(failure)
            }
        }
    }

    async fn persist(&self) -> Result<(EntityId, Vec<u32>), SubmitFailure> {
        let kind = self.draft.kind;
        let body = self.draft.to_create_request();

        let created = self
            .api
            .create_entity(kind, &body)
            .await
            .map_err(|e| {
                warn!(kind = %kind, name = %body.name, error = %e, "Create request failed");
                SubmitFailure {
                    message: failure_message(kind, &e),
                    parent_id: None,
                    parts_created: Vec::new(),
                    failed_part: None,
                }
            })?;

        let mut parts_created = Vec::with_capacity(self.draft.parts.len());
        for part in &self.draft.parts {
            let request = CreatePart {
                parent_id: created.id,
                number: part.number,
                year: part.parsed_year(),
            };

            if let Err(e) = self.api.create_part(kind, &request).await {
                warn!(
                    parent_id = created.id,
                    number = part.number,
                    created = ?parts_created,
                    error = %e,
                    "{} request failed; records already created are kept",
                    kind.child_label()
                );
                return Err(SubmitFailure {
                    message: failure_message(kind, &e),
                    parent_id: Some(created.id),
                    parts_created,
                    failed_part: Some(part.number),
                });
            }
            parts_created.push(part.number);
        }

        info!(id = created.id, kind = %kind, parts = parts_created.len(), "Submit complete");
        Ok((created.id, parts_created))
    }

    fn transition(&self, next: FormPhase) {
        let previous = self.phase.send_replace(next);
        debug!(?previous, ?next, "Form phase changed");
    }
}

fn failure_message(kind: EntityKind, error: &ClientError) -> String {
    error
        .api_message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Failed to save {}", kind.label()))
}
