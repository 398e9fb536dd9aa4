//! In-memory store for testing sessions without a backend.
//!
//! `MemoryStore` holds definitions in a map and records every accepted
//! submission. It can be switched into a failing mode to exercise the
//! retry path.
//!
//! # Example
//!
//! ```
//! use campus_forms::{EngineConfig, FormDefinition, FormId, FormSession, MemoryStore};
//!
//! let store = MemoryStore::new().with_form(FormDefinition::new("feedback", "Feedback"));
//! let mut session = FormSession::open(&store, &FormId::new("feedback"), EngineConfig::default()).unwrap();
//!
//! session.submit(&store).unwrap();
//! assert_eq!(store.submissions().len(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use crate::{FormDefinition, FormId, FormStore, StoreError, SubmissionPayload};

/// A store backed by memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    forms: HashMap<FormId, FormDefinition>,
    submissions: RefCell<Vec<(FormId, SubmissionPayload)>>,
    rejection: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a form definition, replacing one with the same id.
    pub fn with_form(mut self, definition: FormDefinition) -> Self {
        self.forms.insert(definition.id().clone(), definition);
        self
    }

    /// Make every submit fail with the given message until [`MemoryStore::accept`].
    pub fn reject(&self, message: impl Into<String>) {
        *self.rejection.borrow_mut() = Some(message.into());
    }

    /// Accept submits again.
    pub fn accept(&self) {
        *self.rejection.borrow_mut() = None;
    }

    /// Every accepted submission, oldest first.
    pub fn submissions(&self) -> Vec<(FormId, SubmissionPayload)> {
        self.submissions.borrow().clone()
    }
}

impl FormStore for MemoryStore {
    type Error = StoreError;

    fn load(&self, form: &FormId) -> Result<FormDefinition, Self::Error> {
        self.forms
            .get(form)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(form.clone()))
    }

    fn submit(&self, form: &FormId, payload: &SubmissionPayload) -> Result<(), Self::Error> {
        if let Some(message) = self.rejection.borrow().as_ref() {
            return Err(StoreError::backend(anyhow::anyhow!("{message}")));
        }
        self.submissions
            .borrow_mut()
            .push((form.clone(), payload.clone()));
        Ok(())
    }
}
