use crate::{FormId, QuestionId, SectionId};

/// Structural error raised while building or editing a form definition.
///
/// The edit that raised it leaves the definition unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    #[error("A form needs at least one section")]
    NoSections,

    #[error("The only remaining section cannot be deleted")]
    CannotDeleteLastSection,

    #[error("A choice question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("Cannot remove an option: only {remaining} left")]
    CannotRemoveOption { remaining: usize },

    #[error("Duplicate section id: {0}")]
    DuplicateSectionId(SectionId),

    #[error("Duplicate question id: {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("Unknown section: {0}")]
    UnknownSection(SectionId),

    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Question '{0}' has no options")]
    NotAChoiceQuestion(QuestionId),

    #[error("Question '{0}' is not a matrix question")]
    NotAMatrixQuestion(QuestionId),

    #[error("Index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Why a single answer key failed validation.
///
/// The display text is the inline message shown next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A required question has no answer.
    #[error("This field is required")]
    RequiredFieldMissing,

    /// A row of a required matrix question has no rating.
    #[error("This rating is required")]
    MatrixRowMissing,
}

/// Error reported by the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No form definition is stored under this id.
    #[error("Form not found: {0}")]
    NotFound(FormId),

    /// Backend-specific failure (network, rejection, storage).
    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a backend error from any error type.
    ///
    /// A `StoreError` passed through `anyhow` is unwrapped again rather than
    /// nested.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        match err.into().downcast::<StoreError>() {
            Ok(store) => store,
            Err(other) => Self::Backend(other),
        }
    }

    /// Check if this error means the form does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
