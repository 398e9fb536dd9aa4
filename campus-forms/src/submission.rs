//! Submission assembly.
//!
//! Turns a fully validated response store into the flat payload handed to
//! the persistence collaborator.

use std::collections::BTreeMap;

use tracing::warn;

use crate::validator::validate_form;
use crate::visibility::is_visible;
use crate::{
    AnswerKey, AnswerValue, FormDefinition, MatrixQuestion, PayloadValue, Question, QuestionKind,
    Responses, StoreError, SubmissionPayload, ValidationErrors,
};

/// Full-form validation failed; nothing was assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("section {section} has {count} unanswered field(s)", count = .errors.len())]
pub struct Incomplete {
    /// Index of the first section with errors.
    pub section: usize,

    /// The complete error map of that section.
    pub errors: ValidationErrors,
}

/// Error type for submitting a form session.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Validation failed locally; the store was not called.
    #[error("Form is incomplete: {0}")]
    Incomplete(#[from] Incomplete),

    /// The session requires a preview before submitting.
    #[error("Review your answers before submitting")]
    PreviewRequired,

    #[error("Form was already submitted")]
    AlreadySubmitted,

    /// The store refused or failed; answers are kept for a retry.
    #[error("Submission failed, please try again: {0}")]
    RejectedExternal(#[source] StoreError),
}

impl SubmitError {
    /// Check if retrying the same submission can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RejectedExternal(_))
    }
}

/// The submitted value of one question, if it has one.
///
/// Matrix ranks are decoded to column labels; ranks that do not name a
/// column are skipped.
pub fn answer_for(question: &Question, responses: &Responses) -> Option<PayloadValue> {
    match question.kind() {
        QuestionKind::Matrix(matrix) => matrix_answer(question, matrix, responses),
        _ => match responses.get(&AnswerKey::question(question.id()))? {
            value if value.is_empty() => None,
            AnswerValue::Text(text) => Some(PayloadValue::Text(text.clone())),
            AnswerValue::Choices(choices) => Some(PayloadValue::Choices(choices.clone())),
        },
    }
}

fn matrix_answer(
    question: &Question,
    matrix: &MatrixQuestion,
    responses: &Responses,
) -> Option<PayloadValue> {
    let mut rows = BTreeMap::new();
    for row in matrix.rows() {
        let key = AnswerKey::matrix_row(question.id(), row);
        let Some(value) = responses.get(&key) else {
            continue;
        };
        match value.as_rank().and_then(|rank| matrix.label_for_rank(rank)) {
            Some(label) => {
                rows.insert(row.clone(), label.to_string());
            }
            None => warn!(key = %key, value = ?value, "skipping matrix answer that names no column"),
        }
    }
    (!rows.is_empty()).then_some(PayloadValue::Matrix(rows))
}

/// Validate every section and flatten the visible answers.
///
/// Any error in any section aborts assembly and reports the first section
/// with errors; no partial payload is ever produced.
pub fn assemble(
    definition: &FormDefinition,
    responses: &Responses,
) -> Result<SubmissionPayload, Incomplete> {
    if let Some((section, errors)) = validate_form(definition, responses).first_invalid() {
        return Err(Incomplete {
            section,
            errors: errors.clone(),
        });
    }

    Ok(definition
        .questions()
        .filter(|q| is_visible(q, responses))
        .filter_map(|q| answer_for(q, responses).map(|value| (AnswerKey::question(q.id()), value)))
        .collect())
}
