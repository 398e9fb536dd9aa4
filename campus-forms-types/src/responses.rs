use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerKey, AnswerValue, QuestionId};

/// Error type for typed answer access.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Missing answer for key: {0}")]
    MissingKey(AnswerKey),

    #[error("Type mismatch at key '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: AnswerKey,
        expected: &'static str,
        actual: &'static str,
    },
}

/// The in-progress answers of one form-taking session.
///
/// Keys are flat: a matrix row lives under its own `AnswerKey` next to the
/// simple questions. The store is serializable so a presentation layer can
/// hand it to a draft-saving collaborator and restore it later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses {
    values: HashMap<AnswerKey, AnswerValue>,
}

impl Responses {
    /// Create a new empty response store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Store an answer, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<AnswerKey>, value: impl Into<AnswerValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get the answer stored under a key.
    pub fn get(&self, key: &AnswerKey) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    /// Check if an answer exists under a key (even an empty one).
    pub fn contains(&self, key: &AnswerKey) -> bool {
        self.values.contains_key(key)
    }

    /// Remove the answer under a key.
    pub fn remove(&mut self, key: &AnswerKey) -> Option<AnswerValue> {
        self.values.remove(key)
    }

    /// Drop every answer.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Keep only the answers for which the predicate holds.
    pub fn retain(&mut self, mut keep: impl FnMut(&AnswerKey, &AnswerValue) -> bool) {
        self.values.retain(|key, value| keep(key, value));
    }

    /// Get an iterator over all key-value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &AnswerValue)> {
        self.values.iter()
    }

    /// Get the number of stored answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the key holds a non-empty answer.
    ///
    /// Empty strings and empty selections count as unanswered, which is what
    /// the required-field rule looks at.
    pub fn has_value(&self, key: &AnswerKey) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    // === Convenience mutators ===

    /// Check or uncheck one option of a checkbox question.
    ///
    /// Returns whether the option is checked afterwards. A non-list value
    /// stored under the key is replaced by a fresh selection.
    pub fn toggle_choice(&mut self, question: &QuestionId, option: &str) -> bool {
        let entry = self
            .values
            .entry(AnswerKey::question(question))
            .or_insert_with(|| AnswerValue::Choices(Vec::new()));
        if !matches!(entry, AnswerValue::Choices(_)) {
            *entry = AnswerValue::Choices(Vec::new());
        }
        let AnswerValue::Choices(choices) = entry else {
            return false;
        };
        if let Some(pos) = choices.iter().position(|c| c == option) {
            choices.remove(pos);
            false
        } else {
            choices.push(option.to_string());
            true
        }
    }

    /// Store the 1-based column rank chosen for one matrix row.
    pub fn set_matrix_rank(&mut self, question: &QuestionId, row: &str, rank: usize) {
        self.insert(AnswerKey::matrix_row(question, row), AnswerValue::rank(rank));
    }

    // === Convenience accessors ===

    /// Get a string answer.
    pub fn get_text(&self, key: &AnswerKey) -> Result<&str, ResponseError> {
        match self.get(key) {
            Some(AnswerValue::Text(s)) => Ok(s),
            Some(other) => Err(ResponseError::TypeMismatch {
                key: key.clone(),
                expected: "Text",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::MissingKey(key.clone())),
        }
    }

    /// Get the checked options of a checkbox answer.
    pub fn get_choices(&self, key: &AnswerKey) -> Result<&[String], ResponseError> {
        match self.get(key) {
            Some(AnswerValue::Choices(choices)) => Ok(choices),
            Some(other) => Err(ResponseError::TypeMismatch {
                key: key.clone(),
                expected: "Choices",
                actual: other.type_name(),
            }),
            None => Err(ResponseError::MissingKey(key.clone())),
        }
    }
}

impl IntoIterator for Responses {
    type Item = (AnswerKey, AnswerValue);
    type IntoIter = std::collections::hash_map::IntoIter<AnswerKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = (&'a AnswerKey, &'a AnswerValue);
    type IntoIter = std::collections::hash_map::Iter<'a, AnswerKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
