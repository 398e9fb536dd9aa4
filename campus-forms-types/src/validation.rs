use std::collections::BTreeMap;

use crate::{AnswerKey, FieldError};

/// Validation errors of one section, keyed by answer key.
///
/// A validation pass always produces a complete map; callers replace the
/// previous map instead of merging into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<AnswerKey, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AnswerKey, error: FieldError) {
        self.errors.insert(key, error);
    }

    pub fn get(&self, key: &AnswerKey) -> Option<FieldError> {
        self.errors.get(key).copied()
    }

    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.errors.contains_key(key)
    }

    /// The inline message for a key, if it has an error.
    pub fn message(&self, key: &AnswerKey) -> Option<String> {
        self.get(key).map(|e| e.to_string())
    }

    /// Errors in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, FieldError)> {
        self.errors.iter().map(|(k, e)| (k, *e))
    }

    pub fn keys(&self) -> impl Iterator<Item = &AnswerKey> {
        self.errors.keys()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl FromIterator<(AnswerKey, FieldError)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (AnswerKey, FieldError)>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}
