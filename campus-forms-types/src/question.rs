use serde::{Deserialize, Serialize};

use crate::{AnswerKey, DefinitionError, QuestionId};

/// Minimum number of options a radio, checkbox or select question carries.
pub const MIN_OPTIONS: usize = 2;

/// Rating scale used when none is given (1..=5).
pub const DEFAULT_RATING_SCALE: u8 = 5;

/// Column labels given to a new matrix question, lowest rank first.
pub const DEFAULT_MATRIX_COLUMNS: [&str; 5] = ["Poor", "Fair", "Good", "Very Good", "Excellent"];

/// A single question in a form section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within the form.
    id: QuestionId,

    /// The prompt text shown to the user.
    prompt: String,

    /// The kind of question and its kind-specific data.
    #[serde(flatten)]
    kind: QuestionKind,

    /// Whether an answer must be given before the section validates.
    #[serde(default)]
    required: bool,

    /// Purely informational text shown under the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    help_text: Option<String>,

    /// Visibility rule; the question is shown and enforced only when it holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conditional: Option<Condition>,
}

impl Question {
    /// Create a new optional question without help text or conditional.
    pub fn new(id: impl Into<QuestionId>, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind,
            required: false,
            help_text: None,
            conditional: None,
        }
    }

    /// Mark the question as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach help text.
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Show the question only when `depends_on` is answered with `equals`.
    pub fn shown_when(mut self, depends_on: impl Into<QuestionId>, equals: impl Into<String>) -> Self {
        self.conditional = Some(Condition::new(depends_on, equals));
        self
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut QuestionKind {
        &mut self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn conditional(&self) -> Option<&Condition> {
        self.conditional.as_ref()
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub fn set_help_text(&mut self, help_text: Option<String>) {
        self.help_text = help_text;
    }

    pub fn set_conditional(&mut self, conditional: Option<Condition>) {
        self.conditional = conditional;
    }

    /// Switch the question to another kind.
    ///
    /// Options survive a switch between option-bearing kinds. Switching to an
    /// option-bearing kind from anything else starts from two placeholder
    /// options; switching away discards them.
    pub fn change_kind(&mut self, tag: QuestionKindTag) {
        if self.kind.tag() == tag {
            return;
        }
        let options = self.kind.choice().cloned();
        self.kind = match (tag, options) {
            (QuestionKindTag::Radio, Some(choice)) => QuestionKind::Radio(choice),
            (QuestionKindTag::Checkbox, Some(choice)) => QuestionKind::Checkbox(choice),
            (QuestionKindTag::Select, Some(choice)) => QuestionKind::Select(choice),
            (tag, _) => QuestionKind::default_for(tag, DEFAULT_RATING_SCALE),
        };
    }

    /// Every answer key this question writes to.
    ///
    /// A matrix question yields one key per row; every other kind yields its id.
    pub fn answer_keys(&self) -> Vec<AnswerKey> {
        match &self.kind {
            QuestionKind::Matrix(matrix) => matrix
                .rows()
                .iter()
                .map(|row| AnswerKey::matrix_row(&self.id, row))
                .collect(),
            _ => vec![AnswerKey::question(&self.id)],
        }
    }
}

/// A visibility rule referencing another question's current answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// The question whose answer is inspected.
    pub depends_on: QuestionId,

    /// The exact answer that makes the owning question visible.
    pub equals: String,
}

impl Condition {
    pub fn new(depends_on: impl Into<QuestionId>, equals: impl Into<String>) -> Self {
        Self {
            depends_on: depends_on.into(),
            equals: equals.into(),
        }
    }
}

/// The kind of question, determining input type and the data it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Star rating from 1 to the scale.
    Rating(RatingQuestion),

    /// Free text input.
    Text(TextQuestion),

    /// Pick exactly one option (radio buttons).
    Radio(ChoiceQuestion),

    /// Pick any number of options.
    Checkbox(ChoiceQuestion),

    /// Pick exactly one option (drop-down).
    Select(ChoiceQuestion),

    /// Rate several rows on a shared column scale.
    Matrix(MatrixQuestion),
}

impl QuestionKind {
    /// The kind-appropriate defaults for a freshly authored question.
    pub fn default_for(tag: QuestionKindTag, rating_scale: u8) -> Self {
        match tag {
            QuestionKindTag::Rating => Self::Rating(RatingQuestion::new(rating_scale)),
            QuestionKindTag::Text => Self::Text(TextQuestion::default()),
            QuestionKindTag::Radio => Self::Radio(ChoiceQuestion::placeholder()),
            QuestionKindTag::Checkbox => Self::Checkbox(ChoiceQuestion::placeholder()),
            QuestionKindTag::Select => Self::Select(ChoiceQuestion::placeholder()),
            QuestionKindTag::Matrix => Self::Matrix(MatrixQuestion::placeholder()),
        }
    }

    /// The discriminant of this kind.
    pub fn tag(&self) -> QuestionKindTag {
        match self {
            Self::Rating(_) => QuestionKindTag::Rating,
            Self::Text(_) => QuestionKindTag::Text,
            Self::Radio(_) => QuestionKindTag::Radio,
            Self::Checkbox(_) => QuestionKindTag::Checkbox,
            Self::Select(_) => QuestionKindTag::Select,
            Self::Matrix(_) => QuestionKindTag::Matrix,
        }
    }

    /// The options of a radio, checkbox or select question.
    pub fn choice(&self) -> Option<&ChoiceQuestion> {
        match self {
            Self::Radio(choice) | Self::Checkbox(choice) | Self::Select(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn choice_mut(&mut self) -> Option<&mut ChoiceQuestion> {
        match self {
            Self::Radio(choice) | Self::Checkbox(choice) | Self::Select(choice) => Some(choice),
            _ => None,
        }
    }

    pub fn matrix(&self) -> Option<&MatrixQuestion> {
        match self {
            Self::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    pub fn matrix_mut(&mut self) -> Option<&mut MatrixQuestion> {
        match self {
            Self::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }

    /// Check if answers of this kind are a single string another question can depend on.
    pub fn is_single_valued(&self) -> bool {
        !matches!(self, Self::Checkbox(_) | Self::Matrix(_))
    }
}

/// Field-less discriminant of `QuestionKind`, used when authoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKindTag {
    Rating,
    Text,
    Radio,
    Checkbox,
    Select,
    Matrix,
}

impl QuestionKindTag {
    /// Check if questions of this kind carry an option list.
    pub fn has_options(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox | Self::Select)
    }
}

/// Configuration for a rating question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingQuestion {
    /// Highest selectable rating; the lowest is always 1.
    pub scale: u8,
}

impl RatingQuestion {
    pub fn new(scale: u8) -> Self {
        Self {
            scale: scale.max(1),
        }
    }
}

impl Default for RatingQuestion {
    fn default() -> Self {
        Self::new(DEFAULT_RATING_SCALE)
    }
}

/// Configuration for a free text question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextQuestion {
    /// Render as a textarea instead of a single line.
    pub multiline: bool,
}

/// The option list of a radio, checkbox or select question.
///
/// Never holds fewer than [`MIN_OPTIONS`] entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChoiceQuestion")]
pub struct ChoiceQuestion {
    options: Vec<String>,
}

#[derive(Deserialize)]
struct RawChoiceQuestion {
    options: Vec<String>,
}

impl TryFrom<RawChoiceQuestion> for ChoiceQuestion {
    type Error = DefinitionError;

    fn try_from(raw: RawChoiceQuestion) -> Result<Self, Self::Error> {
        Self::new(raw.options)
    }
}

impl ChoiceQuestion {
    /// Create a choice question, rejecting lists shorter than the minimum.
    pub fn new<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
    ) -> Result<Self, DefinitionError> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.len() < MIN_OPTIONS {
            return Err(DefinitionError::TooFewOptions {
                count: options.len(),
            });
        }
        Ok(Self { options })
    }

    /// Two placeholder options, `Option 1` and `Option 2`.
    pub fn placeholder() -> Self {
        Self {
            options: (1..=MIN_OPTIONS).map(|n| format!("Option {n}")).collect(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Check if `value` is one of the options.
    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Append a placeholder option named after its position.
    pub fn add_option(&mut self) -> &str {
        let label = format!("Option {}", self.options.len() + 1);
        self.options.push(label);
        &self.options[self.options.len() - 1]
    }

    pub fn update_option(
        &mut self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<(), DefinitionError> {
        let len = self.options.len();
        let option = self
            .options
            .get_mut(index)
            .ok_or(DefinitionError::IndexOutOfRange { index, len })?;
        *option = label.into();
        Ok(())
    }

    /// Remove an option, refusing to go below the minimum.
    pub fn remove_option(&mut self, index: usize) -> Result<String, DefinitionError> {
        let len = self.options.len();
        if len <= MIN_OPTIONS {
            return Err(DefinitionError::CannotRemoveOption { remaining: len });
        }
        if index >= len {
            return Err(DefinitionError::IndexOutOfRange { index, len });
        }
        Ok(self.options.remove(index))
    }
}

/// Configuration for a matrix question: several rows rated on one column scale.
///
/// Each row is answered independently under `{questionId}-{rowSlug}`; the
/// stored value is the 1-based rank of the chosen column. Rows and columns may
/// be empty while authoring; see [`MatrixQuestion::is_renderable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixQuestion {
    #[serde(default)]
    rows: Vec<String>,
    #[serde(default)]
    columns: Vec<String>,
}

impl MatrixQuestion {
    pub fn new<R: Into<String>, C: Into<String>>(
        rows: impl IntoIterator<Item = R>,
        columns: impl IntoIterator<Item = C>,
    ) -> Self {
        Self {
            rows: rows.into_iter().map(Into::into).collect(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// One placeholder row on the default five-label scale.
    pub fn placeholder() -> Self {
        Self::new(["Row 1"], DEFAULT_MATRIX_COLUMNS)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// At least one row and one column.
    pub fn is_renderable(&self) -> bool {
        !self.rows.is_empty() && !self.columns.is_empty()
    }

    /// The 1-based rank of a column label.
    pub fn rank_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column).map(|i| i + 1)
    }

    /// The column label for a 1-based rank.
    pub fn label_for_rank(&self, rank: usize) -> Option<&str> {
        rank.checked_sub(1)
            .and_then(|i| self.columns.get(i))
            .map(String::as_str)
    }

    pub fn add_row(&mut self, label: impl Into<String>) {
        self.rows.push(label.into());
    }

    pub fn update_row(&mut self, index: usize, label: impl Into<String>) -> Result<(), DefinitionError> {
        update_label(&mut self.rows, index, label)
    }

    pub fn remove_row(&mut self, index: usize) -> Result<String, DefinitionError> {
        remove_label(&mut self.rows, index)
    }

    pub fn add_column(&mut self, label: impl Into<String>) {
        self.columns.push(label.into());
    }

    pub fn update_column(
        &mut self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<(), DefinitionError> {
        update_label(&mut self.columns, index, label)
    }

    pub fn remove_column(&mut self, index: usize) -> Result<String, DefinitionError> {
        remove_label(&mut self.columns, index)
    }
}

fn update_label(
    labels: &mut [String],
    index: usize,
    label: impl Into<String>,
) -> Result<(), DefinitionError> {
    let len = labels.len();
    let slot = labels
        .get_mut(index)
        .ok_or(DefinitionError::IndexOutOfRange { index, len })?;
    *slot = label.into();
    Ok(())
}

fn remove_label(labels: &mut Vec<String>, index: usize) -> Result<String, DefinitionError> {
    if index >= labels.len() {
        return Err(DefinitionError::IndexOutOfRange {
            index,
            len: labels.len(),
        });
    }
    Ok(labels.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radio() -> Question {
        Question::new(
            "pace",
            "How was the pace?",
            QuestionKind::Radio(ChoiceQuestion::new(["Too slow", "Just right", "Too fast"]).unwrap()),
        )
    }

    #[test]
    fn choice_requires_two_options() {
        let err = ChoiceQuestion::new(["Only"]).unwrap_err();
        assert!(matches!(err, DefinitionError::TooFewOptions { count: 1 }));
    }

    #[test]
    fn option_floor() {
        let mut choice = ChoiceQuestion::placeholder();
        for index in 0..3 {
            let err = choice.remove_option(index).unwrap_err();
            assert!(matches!(err, DefinitionError::CannotRemoveOption { remaining: 2 }));
        }
        assert_eq!(choice.options(), ["Option 1", "Option 2"]);
    }

    #[test]
    fn add_and_remove_option() {
        let mut choice = ChoiceQuestion::placeholder();
        assert_eq!(choice.add_option(), "Option 3");
        assert_eq!(choice.remove_option(0).unwrap(), "Option 1");
        assert_eq!(choice.options(), ["Option 2", "Option 3"]);
    }

    #[test]
    fn update_option_out_of_range() {
        let mut choice = ChoiceQuestion::placeholder();
        let err = choice.update_option(5, "Nope").unwrap_err();
        assert!(matches!(err, DefinitionError::IndexOutOfRange { index: 5, len: 2 }));
    }

    #[test]
    fn change_kind_keeps_options_between_choice_kinds() {
        let mut question = radio();
        question.change_kind(QuestionKindTag::Select);

        let choice = question.kind().choice().unwrap();
        assert_eq!(choice.options(), ["Too slow", "Just right", "Too fast"]);
        assert_eq!(question.kind().tag(), QuestionKindTag::Select);
    }

    #[test]
    fn change_kind_discards_options() {
        let mut question = radio();
        question.change_kind(QuestionKindTag::Text);
        assert!(question.kind().choice().is_none());

        question.change_kind(QuestionKindTag::Checkbox);
        assert_eq!(
            question.kind().choice().unwrap().options(),
            ["Option 1", "Option 2"]
        );
    }

    #[test]
    fn matrix_ranks() {
        let matrix = MatrixQuestion::new(["Library"], DEFAULT_MATRIX_COLUMNS);
        assert_eq!(matrix.rank_of("Good"), Some(3));
        assert_eq!(matrix.label_for_rank(3), Some("Good"));
        assert_eq!(matrix.label_for_rank(0), None);
        assert_eq!(matrix.label_for_rank(6), None);
    }

    #[test]
    fn matrix_authoring_is_lenient() {
        let mut matrix = MatrixQuestion::placeholder();
        matrix.remove_row(0).unwrap();
        assert!(!matrix.is_renderable());
        assert!(matrix.remove_row(0).is_err());
    }

    #[test]
    fn answer_keys_for_matrix() {
        let question = Question::new(
            "facilities",
            "Rate the facilities",
            QuestionKind::Matrix(MatrixQuestion::new(["Library", "Sports Complex"], ["Bad", "Good"])),
        );
        let keys: Vec<_> = question.answer_keys().into_iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, ["facilities-library", "facilities-sports-complex"]);
    }

    #[test]
    fn json_shape() {
        let question = radio().required().shown_when("attended", "Yes");
        let json = serde_json::to_value(&question).unwrap();

        assert_eq!(json["kind"], "radio");
        assert_eq!(json["options"][1], "Just right");
        assert_eq!(json["required"], true);
        assert_eq!(json["conditional"]["depends_on"], "attended");

        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, question);
    }

    #[test]
    fn json_rejects_short_option_list() {
        let json = r#"{"id":"q","prompt":"?","kind":"select","options":["one"]}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn json_defaults() {
        let json = r#"{"id":"stars","prompt":"Overall","kind":"rating"}"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind(), &QuestionKind::Rating(RatingQuestion::new(5)));
        assert!(!question.is_required());
        assert!(question.conditional().is_none());
    }
}
