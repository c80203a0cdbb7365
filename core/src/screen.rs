//! Per-view state for list and form screens.
//!
//! # Design
//! Every view owns its state explicitly: nothing is process-wide. A
//! `ListScreen` is reset by `enter` and cleared by `leave`. Loads are tagged
//! with a `LoadTicket` carrying the screen's generation; `leave` and each new
//! load bump the generation, and `finish_load` drops any result whose ticket
//! is stale. A response that arrives after its view was left (or after a
//! newer refresh started) is therefore ignored, never applied.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::resource::Resource;
use crate::service::EntityService;
use crate::transport::Transport;
use crate::types::EntityId;
use crate::validation::field_messages;

/// Identifies one load started by a `ListScreen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// The ticket was stale; the screen was left untouched.
    Discarded,
}

pub struct ListScreen<R: Resource> {
    items: Vec<R::Record>,
    loading: bool,
    error: Option<ApiError>,
    active: bool,
    generation: u64,
}

impl<R: Resource> Default for ListScreen<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            active: false,
            generation: 0,
        }
    }
}

impl<R: Resource> ListScreen<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the view and start its initial load.
    pub fn enter(&mut self) -> LoadTicket {
        self.items.clear();
        self.error = None;
        self.active = true;
        self.begin_load()
    }

    /// Clear the view. Loads still in flight will be discarded.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.items.clear();
        self.error = None;
        self.loading = false;
        self.active = false;
    }

    /// Start a (re)load; supersedes any load still in flight. An inactive
    /// screen hands out a ticket but never reports loading.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = self.active;
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<R::Record>, ApiError>,
    ) -> LoadOutcome {
        if !self.active || ticket.generation != self.generation {
            return LoadOutcome::Discarded;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                LoadOutcome::Applied
            }
            Err(err) => {
                self.error = Some(err);
                LoadOutcome::Failed
            }
        }
    }

    /// Load the collection from `service` and apply the result.
    pub async fn refresh<T: Transport>(&mut self, service: &EntityService<R, T>) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = service.list().await;
        self.finish_load(ticket, result)
    }

    /// Delete one record, then reload the list. A failed delete leaves the
    /// list as it was and is returned to the caller.
    pub async fn delete<T: Transport>(
        &mut self,
        service: &EntityService<R, T>,
        id: EntityId,
    ) -> Result<LoadOutcome, ApiError> {
        service.delete(id).await?;
        Ok(self.refresh(service).await)
    }

    pub fn items(&self) -> &[R::Record] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Local validation failed; nothing was sent.
    #[error("invalid input: {}", summary(.0))]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn summary(errors: &ValidationErrors) -> String {
    field_messages(errors)
        .into_iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// State of a create or edit form.
#[derive(Debug, Default)]
pub struct FormScreen {
    submitting: bool,
    field_errors: BTreeMap<String, String>,
}

impl FormScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `input`, then create it. Invalid input never reaches the
    /// service.
    pub async fn submit_create<R: Resource, T: Transport>(
        &mut self,
        service: &EntityService<R, T>,
        input: &R::Create,
    ) -> Result<R::Record, SubmitError> {
        self.check(input)?;
        self.submitting = true;
        let result = service.create(input).await;
        self.submitting = false;
        Ok(result?)
    }

    pub async fn submit_update<R: Resource, T: Transport>(
        &mut self,
        service: &EntityService<R, T>,
        id: EntityId,
        input: &R::Update,
    ) -> Result<R::Record, SubmitError> {
        self.check(input)?;
        self.submitting = true;
        let result = service.update(id, input).await;
        self.submitting = false;
        Ok(result?)
    }

    fn check<V: Validate>(&mut self, input: &V) -> Result<(), SubmitError> {
        self.field_errors.clear();
        if let Err(errors) = input.validate() {
            for (field, message) in field_messages(&errors) {
                self.field_errors.entry(field).or_insert(message);
            }
            return Err(SubmitError::Invalid(errors));
        }
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// First validation message for `field` (wire name) from the last submit.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }
}
