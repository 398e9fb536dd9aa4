//! Section and whole-form validation.
//!
//! Only two rules exist: a visible required question must be answered, and
//! every row of a visible required matrix question must be rated with a rank
//! that names one of its columns. Hidden questions are never validated.

use crate::visibility::is_visible;
use crate::{AnswerKey, FieldError, FormDefinition, Question, QuestionKind, Responses, Section, ValidationErrors};

/// Validate one section against the current answers.
///
/// The returned map is complete for the section and replaces any earlier
/// result; matrix row errors are keyed by the row, not the question.
pub fn validate_section(section: &Section, responses: &Responses) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for question in section.questions() {
        validate_question(question, responses, &mut errors);
    }
    errors
}

fn validate_question(question: &Question, responses: &Responses, errors: &mut ValidationErrors) {
    if !question.is_required() || !is_visible(question, responses) {
        return;
    }
    match question.kind() {
        QuestionKind::Matrix(matrix) => {
            for row in matrix.rows() {
                let key = AnswerKey::matrix_row(question.id(), row);
                let rated = responses
                    .get(&key)
                    .and_then(|value| value.as_rank())
                    .and_then(|rank| matrix.label_for_rank(rank))
                    .is_some();
                if !rated {
                    errors.insert(key, FieldError::MatrixRowMissing);
                }
            }
        }
        _ => {
            let key = AnswerKey::question(question.id());
            if !responses.has_value(&key) {
                errors.insert(key, FieldError::RequiredFieldMissing);
            }
        }
    }
}

/// Validation result of every section of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValidation {
    sections: Vec<ValidationErrors>,
}

impl FormValidation {
    /// Errors of the section at `index`.
    pub fn section(&self, index: usize) -> Option<&ValidationErrors> {
        self.sections.get(index)
    }

    /// The first section with errors, with those errors.
    pub fn first_invalid(&self) -> Option<(usize, &ValidationErrors)> {
        self.sections
            .iter()
            .enumerate()
            .find(|(_, errors)| !errors.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.sections.iter().all(ValidationErrors::is_empty)
    }

    /// Total number of errors across sections.
    pub fn error_count(&self) -> usize {
        self.sections.iter().map(ValidationErrors::len).sum()
    }

    pub fn into_sections(self) -> Vec<ValidationErrors> {
        self.sections
    }
}

/// Validate every section of a form, regardless of which one is active.
pub fn validate_form(definition: &FormDefinition, responses: &Responses) -> FormValidation {
    FormValidation {
        sections: definition
            .sections()
            .iter()
            .map(|section| validate_section(section, responses))
            .collect(),
    }
}
