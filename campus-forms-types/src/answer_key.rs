use std::fmt;

use serde::{Deserialize, Serialize};

use crate::QuestionId;

/// The key under which an answer is stored, e.g. `"pace"` or `"facilities-library"`.
///
/// Simple question kinds store their answer under the question id. Matrix
/// questions store one answer per row under `{questionId}-{rowSlug}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    key: String,
}

impl AnswerKey {
    /// Create a key from a raw string.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The key of a simple (non-matrix) question.
    pub fn question(id: &QuestionId) -> Self {
        Self::new(id.as_str())
    }

    /// The key of one row of a matrix question.
    pub fn matrix_row(id: &QuestionId, row: &str) -> Self {
        Self::new(format!("{}-{}", id, slugify(row)))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Check if this key belongs to a row of the given matrix question.
    pub fn is_row_of(&self, id: &QuestionId) -> bool {
        self.key
            .strip_prefix(id.as_str())
            .is_some_and(|rest| rest.len() > 1 && rest.starts_with('-'))
    }
}

/// Lowercase a label and collapse every run of non-alphanumeric characters into `-`.
///
/// ```
/// use campus_forms_types::slugify;
///
/// assert_eq!(slugify("Library"), "library");
/// assert_eq!(slugify("  Wi-Fi / Internet "), "wi-fi-internet");
/// ```
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for AnswerKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AnswerKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&QuestionId> for AnswerKey {
    fn from(id: &QuestionId) -> Self {
        Self::question(id)
    }
}

impl From<QuestionId> for AnswerKey {
    fn from(id: QuestionId) -> Self {
        Self::question(&id)
    }
}
