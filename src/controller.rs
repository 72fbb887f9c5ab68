//! The resource collection controller.
//!
//! One instance per dashboard: an in-memory copy of a remote collection plus
//! the filter/sort projection, the selection set, and the modal workflow that
//! drives create/update/delete against the backend. The local copy changes
//! only after the server confirms a mutation; a failed write leaves the prior
//! state untouched and the modal open for a retry.

use std::collections::HashSet;

use futures::future::join_all;
use log::warn;

use crate::error::ApiError;
use crate::projection::{self, SortOrder};
use crate::remote::Backend;
use crate::resource::Resource;
use crate::selection::SelectionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit,
    View,
}

/// The modal workflow state. The draft is a snapshot taken when the modal
/// opened, never a live reference into the collection.
#[derive(Debug, Clone)]
pub enum Modal<E> {
    Closed,
    Open {
        mode: ModalMode,
        draft: E,
        /// True while a create/update is in flight; blocks re-submission.
        pending: bool,
        /// Inline error from the last failed submit.
        error: Option<String>,
    },
}

impl<E> Modal<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, Modal::Open { .. })
    }
}

/// Outcome of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    /// Nothing was sent: the modal was closed, read-only, or already pending.
    Ignored,
}

/// Settled results of a batch delete. Partial failure is expected: confirmed
/// deletions stay applied, failed ids stay in the collection and selection.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub deleted: Vec<String>,
    pub failed: Vec<(String, ApiError)>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// One aggregate line for the user.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("Deleted {} item(s).", self.deleted.len())
        } else {
            let reasons: Vec<String> = self
                .failed
                .iter()
                .map(|(id, err)| format!("{id}: {err}"))
                .collect();
            format!(
                "Deleted {} item(s), {} failed ({})",
                self.deleted.len(),
                self.failed.len(),
                reasons.join("; ")
            )
        }
    }
}

pub struct Controller<E: Resource, B: Backend> {
    backend: B,
    items: Vec<E>,
    status: LoadStatus,
    query: String,
    order: SortOrder,
    selection: SelectionSet,
    modal: Modal<E>,
    /// Ids with a single-item delete in flight.
    deleting: HashSet<String>,
}

impl<E: Resource, B: Backend> Controller<E, B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            items: Vec::new(),
            status: LoadStatus::Idle,
            query: String::new(),
            order: SortOrder::default(),
            selection: SelectionSet::default(),
            modal: Modal::Closed,
            deleting: HashSet::new(),
        }
    }

    // =========================================================================
    // Collection store
    // =========================================================================

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Fetch the full remote collection. Success replaces the items
    /// wholesale; failure keeps the previous items visible alongside the
    /// error status. Never retried automatically.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.status = LoadStatus::Loading;
        match self.backend.list(E::COLLECTION).await {
            Ok(docs) => {
                let mut items = Vec::with_capacity(docs.len());
                for doc in docs {
                    match serde_json::from_value::<E>(doc) {
                        Ok(entity) => items.push(entity),
                        Err(err) => {
                            warn!("skipping malformed {} document: {err}", E::COLLECTION);
                        }
                    }
                }
                self.items = items;
                self.status = LoadStatus::Ready;
                self.prune_selection();
                Ok(())
            }
            Err(err) => {
                self.status = LoadStatus::Error;
                Err(err)
            }
        }
    }

    /// Prepend a confirmed entity; new items are surfaced first. The id must
    /// not already exist in the collection.
    pub fn insert(&mut self, entity: E) {
        if self.items.iter().any(|e| e.id() == entity.id()) {
            warn!(
                "ignoring insert of duplicate {} id {}",
                E::COLLECTION,
                entity.id()
            );
            return;
        }
        self.items.insert(0, entity);
    }

    /// Overwrite the entity with the same id in place; position unchanged.
    pub fn replace(&mut self, entity: E) {
        match self.items.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => *slot = entity,
            None => warn!(
                "ignoring replace of unknown {} id {}",
                E::COLLECTION,
                entity.id()
            ),
        }
    }

    /// Remove a confirmed-deleted entity and drop its id from the selection.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|e| e.id() != id);
        self.selection.remove(id);
    }

    /// Bulk removal; ids that no longer exist are silently ignored (another
    /// client may have deleted them first).
    pub fn remove_many(&mut self, ids: &HashSet<String>) {
        self.items.retain(|e| !ids.contains(e.id()));
        self.prune_selection();
    }

    fn prune_selection(&mut self) {
        let existing: HashSet<&str> = self.items.iter().map(|e| e.id()).collect();
        self.selection.prune(&existing);
    }

    // =========================================================================
    // View projection
    // =========================================================================

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    /// The currently displayed sequence: filtered, then stable-sorted.
    pub fn visible(&self) -> Vec<&E> {
        projection::project(&self.items, &self.query, self.order)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Mark or unmark an id for batch deletion. Ids not present in the
    /// collection are refused. Returns whether the id is selected afterwards.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        if !self.selection.contains(id) && !self.items.iter().any(|e| e.id() == id) {
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // =========================================================================
    // Mutation workflow
    // =========================================================================

    pub fn modal(&self) -> &Modal<E> {
        &self.modal
    }

    pub fn open_add(&mut self) {
        self.modal = Modal::Open {
            mode: ModalMode::Add,
            draft: E::default(),
            pending: false,
            error: None,
        };
    }

    /// Open the edit modal on a snapshot of the entity. Returns false when
    /// the id is not in the collection.
    pub fn open_edit(&mut self, id: &str) -> bool {
        self.open_on(ModalMode::Edit, id)
    }

    /// Open the read-only view modal. Returns false when the id is not in
    /// the collection.
    pub fn open_view(&mut self, id: &str) -> bool {
        self.open_on(ModalMode::View, id)
    }

    fn open_on(&mut self, mode: ModalMode, id: &str) -> bool {
        let Some(entity) = self.items.iter().find(|e| e.id() == id) else {
            return false;
        };
        self.modal = Modal::Open {
            mode,
            draft: entity.clone(),
            pending: false,
            error: None,
        };
        true
    }

    /// Close the modal, discarding any draft edits.
    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Mutable access to the form draft. None while a request is pending and
    /// in view mode, which is read-only.
    pub fn draft_mut(&mut self) -> Option<&mut E> {
        match &mut self.modal {
            Modal::Open { pending: true, .. } => None,
            Modal::Open {
                mode: ModalMode::View,
                ..
            } => None,
            Modal::Open { draft, .. } => Some(draft),
            Modal::Closed => None,
        }
    }

    /// Submit the modal draft: POST for add, PUT for edit. On success the
    /// server-returned canonical entity is applied to the collection and the
    /// modal closes; on failure the modal stays open with an inline error so
    /// the user's input is not lost. Re-submission while a request is in
    /// flight is ignored.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ApiError> {
        let (mode, draft) = match &self.modal {
            Modal::Closed => return Ok(SubmitOutcome::Ignored),
            Modal::Open { pending: true, .. } => return Ok(SubmitOutcome::Ignored),
            Modal::Open {
                mode: ModalMode::View,
                ..
            } => return Ok(SubmitOutcome::Ignored),
            Modal::Open { mode, draft, .. } => (*mode, draft.clone()),
        };

        if let Err(reason) = draft.validate() {
            self.set_modal_error(&reason);
            return Err(ApiError::Validation(reason));
        }

        self.set_pending(true);
        match self.perform_submit(mode, &draft).await {
            Ok(()) => {
                self.modal = Modal::Closed;
                Ok(SubmitOutcome::Saved)
            }
            Err(err) => {
                self.set_pending(false);
                self.set_modal_error(&err.to_string());
                Err(err)
            }
        }
    }

    async fn perform_submit(&mut self, mode: ModalMode, draft: &E) -> Result<(), ApiError> {
        let body = serde_json::to_value(draft)?;
        match mode {
            ModalMode::Add => {
                let doc = self.backend.create(E::COLLECTION, &body).await?;
                let canonical: E = serde_json::from_value(doc)?;
                self.insert(canonical);
            }
            ModalMode::Edit => {
                let doc = self
                    .backend
                    .update(E::COLLECTION, draft.id(), &body)
                    .await?;
                let canonical: E = serde_json::from_value(doc)?;
                self.replace(canonical);
            }
            ModalMode::View => {}
        }
        Ok(())
    }

    fn set_pending(&mut self, value: bool) {
        if let Modal::Open { pending, .. } = &mut self.modal {
            *pending = value;
        }
    }

    fn set_modal_error(&mut self, message: &str) {
        if let Modal::Open { error, .. } = &mut self.modal {
            *error = Some(message.to_string());
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Delete a single entity. The local copy is removed only after the
    /// server confirms. Returns false when the id is unknown or a delete for
    /// it is already in flight.
    pub async fn delete(&mut self, id: &str) -> Result<bool, ApiError> {
        if !self.items.iter().any(|e| e.id() == id) {
            return Ok(false);
        }
        if !self.deleting.insert(id.to_string()) {
            return Ok(false);
        }
        let result = self.backend.delete(E::COLLECTION, id).await;
        self.deleting.remove(id);
        match result {
            Ok(()) => {
                self.remove(id);
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Delete every selected entity. All deletes are issued concurrently and
    /// settled together: confirmed ids are removed from the collection and
    /// selection, failed ids stay in both. An empty selection is refused.
    pub async fn delete_selected(&mut self) -> Result<BatchReport, ApiError> {
        if self.selection.is_empty() {
            return Err(ApiError::Validation("nothing is selected".into()));
        }

        let ids = self.selection.ids();
        let settled = join_all(
            ids.iter()
                .map(|id| self.backend.delete(E::COLLECTION, id)),
        )
        .await;

        let mut report = BatchReport::default();
        for (id, outcome) in ids.into_iter().zip(settled) {
            match outcome {
                Ok(()) => report.deleted.push(id),
                Err(err) => report.failed.push((id, err)),
            }
        }

        let confirmed: HashSet<String> = report.deleted.iter().cloned().collect();
        self.remove_many(&confirmed);

        Ok(report)
    }
}
