use serde::{Deserialize, Serialize};

/// A single answer value held in `Responses`.
///
/// Rating, text, radio and select answers are strings. Matrix rows store the
/// 1-based rank of the chosen column as a numeric string. Checkbox answers are
/// the list of checked options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A single string value.
    Text(String),

    /// The checked options of a checkbox question.
    Choices(Vec<String>),
}

impl AnswerValue {
    /// A rating answer, stored as its decimal string.
    pub fn rating(value: u8) -> Self {
        Self::Text(value.to_string())
    }

    /// A matrix row answer holding the 1-based column rank.
    pub fn rank(rank: usize) -> Self {
        Self::Text(rank.to_string())
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Choices(_) => None,
        }
    }

    /// Try to get this value as a list of checked options.
    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Choices(choices) => Some(choices),
            Self::Text(_) => None,
        }
    }

    /// Try to read this value as a matrix rank.
    pub fn as_rank(&self) -> Option<usize> {
        self.as_str().and_then(|s| s.trim().parse().ok())
    }

    /// An empty string or an empty selection counts as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Choices(choices) => choices.is_empty(),
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Choices(_) => "Choices",
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(choices: Vec<String>) -> Self {
        Self::Choices(choices)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(choices: Vec<&str>) -> Self {
        Self::Choices(choices.into_iter().map(String::from).collect())
    }
}
