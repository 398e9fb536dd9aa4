use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::AnswerKey;

/// One submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// Rating, text, radio or select answer.
    Text(String),

    /// Checked options of a checkbox question.
    Choices(Vec<String>),

    /// Matrix rows mapped to the label of the chosen column.
    Matrix(BTreeMap<String, String>),
}

impl PayloadValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Matrix(rows) => Some(rows),
            _ => None,
        }
    }
}

/// The flattened, validated record handed to the persistence collaborator.
///
/// Entries keep presentation order (section by section, question by
/// question) and serialize as a single JSON object. Matrix questions appear
/// once, under the question id, as a `{row: columnLabel}` object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPayload {
    entries: Vec<(AnswerKey, PayloadValue)>,
}

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. A repeated key replaces the earlier value in place.
    pub fn push(&mut self, key: AnswerKey, value: PayloadValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &PayloadValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &AnswerKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the payload as a JSON object, keys in presentation order.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for SubmissionPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl FromIterator<(AnswerKey, PayloadValue)> for SubmissionPayload {
    fn from_iter<I: IntoIterator<Item = (AnswerKey, PayloadValue)>>(iter: I) -> Self {
        let mut payload = Self::new();
        for (key, value) in iter {
            payload.push(key, value);
        }
        payload
    }
}
