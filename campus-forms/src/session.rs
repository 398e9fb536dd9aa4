//! A single form-taking session.
//!
//! The session owns the response store of one user, walks the definition
//! section by section and refuses to move forward (or submit) while the
//! current section has unanswered required fields.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::navigation::{Navigator, Phase, Step};
use crate::submission::{SubmitError, answer_for, assemble};
use crate::validator::validate_section;
use crate::visibility::{clear_hidden_answers, visible_questions};
use crate::{
    AnswerKey, AnswerValue, EngineConfig, FieldError, FormDefinition, FormId, FormStore,
    HiddenAnswerPolicy, PayloadValue, Question, QuestionId, Responses, Section, StoreError,
    SubmissionPayload, ValidationErrors,
};

/// One section as shown on the preview screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSection {
    pub title: String,
    pub answers: Vec<PreviewAnswer>,
}

/// One visible question with its current answer, matrix ranks decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewAnswer {
    pub question: QuestionId,
    pub prompt: String,
    pub answer: Option<PayloadValue>,
}

/// Answers, position and surfaced errors of one user filling in one form.
#[derive(Debug, Clone)]
pub struct FormSession {
    definition: Arc<FormDefinition>,
    responses: Responses,
    navigator: Navigator,
    /// Errors of the current section from the last validation pass.
    errors: ValidationErrors,
    config: EngineConfig,
}

impl FormSession {
    /// Start an empty session on the first section.
    pub fn new(definition: impl Into<Arc<FormDefinition>>, config: EngineConfig) -> Self {
        let definition = definition.into();
        let navigator = Navigator::new(definition.section_count());
        Self {
            definition,
            responses: Responses::new(),
            navigator,
            errors: ValidationErrors::new(),
            config,
        }
    }

    /// Continue from previously saved answers, starting on the first section.
    pub fn resume(
        definition: impl Into<Arc<FormDefinition>>,
        responses: Responses,
        config: EngineConfig,
    ) -> Self {
        let mut session = Self::new(definition, config);
        session.responses = responses;
        session.apply_hidden_policy();
        session
    }

    /// Load a definition from the store and start a session on it.
    pub fn open<S: FormStore>(
        store: &S,
        form: &FormId,
        config: EngineConfig,
    ) -> Result<Self, StoreError> {
        let definition = store.load(form).map_err(StoreError::backend)?;
        debug!(form = %form, sections = definition.section_count(), "form loaded");
        Ok(Self::new(definition, config))
    }

    pub fn definition(&self) -> &Arc<FormDefinition> {
        &self.definition
    }

    /// The in-progress answers, e.g. for saving a draft.
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.navigator.phase()
    }

    pub fn is_preview(&self) -> bool {
        self.phase() == Phase::Preview
    }

    pub fn is_submitted(&self) -> bool {
        self.phase() == Phase::Submitted
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    pub fn current_section(&self) -> &Section {
        // The navigator is clamped to the section count, which never changes.
        &self.definition.sections()[self.navigator.current()]
    }

    pub fn is_last_section(&self) -> bool {
        self.navigator.is_last()
    }

    /// Completion percentage of the progress indicator.
    pub fn progress(&self) -> f64 {
        self.navigator.progress()
    }

    /// Errors surfaced for the current section.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn error_for(&self, key: &AnswerKey) -> Option<FieldError> {
        self.errors.get(key)
    }

    /// Questions of the current section that are shown right now.
    pub fn visible_questions(&self) -> Vec<&Question> {
        visible_questions(self.current_section(), &self.responses).collect()
    }

    // === Answering ===

    /// Store an answer. Ignored (returns `false`) outside the editing phase.
    pub fn set_answer(&mut self, key: impl Into<AnswerKey>, value: impl Into<AnswerValue>) -> bool {
        if !self.accepts_answers() {
            return false;
        }
        self.responses.insert(key, value);
        self.after_change();
        true
    }

    /// Forget an answer. Ignored (returns `false`) outside the editing phase.
    pub fn clear_answer(&mut self, key: &AnswerKey) -> bool {
        if !self.accepts_answers() {
            return false;
        }
        self.responses.remove(key);
        self.after_change();
        true
    }

    /// Check or uncheck a checkbox option; returns whether it is now checked.
    pub fn toggle_choice(&mut self, question: &QuestionId, option: &str) -> bool {
        if !self.accepts_answers() {
            return false;
        }
        let checked = self.responses.toggle_choice(question, option);
        self.after_change();
        checked
    }

    /// Rate one matrix row with a 1-based column rank.
    ///
    /// Refused (returns `false`) when the question is not a matrix, the row
    /// is not one of its rows or the rank names no column.
    pub fn set_matrix_rank(&mut self, question: &QuestionId, row: &str, rank: usize) -> bool {
        if !self.accepts_answers() {
            return false;
        }
        let fits = self
            .definition
            .find_question(question)
            .and_then(|(_, q)| q.kind().matrix())
            .is_some_and(|m| m.rows().iter().any(|r| r == row) && m.label_for_rank(rank).is_some());
        if !fits {
            debug!(question = %question, row, rank, "ignoring rank outside the matrix");
            return false;
        }
        self.responses.set_matrix_rank(question, row, rank);
        self.after_change();
        true
    }

    fn accepts_answers(&self) -> bool {
        let editing = self.phase() == Phase::Editing;
        if !editing {
            debug!(phase = ?self.phase(), "ignoring answer change outside editing");
        }
        editing
    }

    fn after_change(&mut self) {
        self.apply_hidden_policy();
        if !self.errors.is_empty() {
            self.errors = validate_section(self.current_section(), &self.responses);
        }
    }

    fn apply_hidden_policy(&mut self) {
        if self.config.hidden_answers == HiddenAnswerPolicy::Clear {
            let removed = clear_hidden_answers(&self.definition, &mut self.responses);
            if !removed.is_empty() {
                debug!(removed = removed.len(), "cleared answers of hidden questions");
            }
        }
    }

    // === Navigation ===

    /// Validate the current section and move to the next one if it is clean.
    pub fn go_next(&mut self) -> Step {
        if self.phase() != Phase::Editing {
            return Step::Stayed;
        }
        if let Some(blocked) = self.check_current_section() {
            return blocked;
        }
        let step = self.navigator.advance();
        debug!(?step, "next section");
        step
    }

    /// Move back one section without validating.
    pub fn go_prev(&mut self) -> Step {
        self.move_unvalidated(self.navigator.current().saturating_sub(1))
    }

    /// Jump to any section without validating (the section selector).
    pub fn go_to(&mut self, index: usize) -> Step {
        self.move_unvalidated(index)
    }

    fn move_unvalidated(&mut self, index: usize) -> Step {
        if self.phase() != Phase::Editing {
            return Step::Stayed;
        }
        let step = self.navigator.jump(index);
        if matches!(step, Step::Moved { .. }) {
            self.errors = ValidationErrors::new();
            debug!(?step, "moved without validation");
        }
        step
    }

    /// On the last section, validate it and enter the preview.
    pub fn request_preview(&mut self) -> Step {
        if self.phase() != Phase::Editing || !self.navigator.is_last() {
            return Step::Stayed;
        }
        if let Some(blocked) = self.check_current_section() {
            return blocked;
        }
        self.navigator.set_phase(Phase::Preview);
        debug!("entered preview");
        Step::Previewing
    }

    /// Leave the preview for the last section; returns `false` if not previewing.
    pub fn back_to_edit(&mut self) -> bool {
        if !self.is_preview() {
            return false;
        }
        self.navigator.set_phase(Phase::Editing);
        true
    }

    /// Replace the surfaced errors with a fresh pass over the current section.
    fn check_current_section(&mut self) -> Option<Step> {
        self.errors = validate_section(self.current_section(), &self.responses);
        if self.errors.is_empty() {
            return None;
        }
        let errors = self.errors.len();
        debug!(section = self.navigator.current(), errors, "section has errors");
        Some(Step::Blocked { errors })
    }

    /// Every section with its visible questions and current answers.
    pub fn preview(&self) -> Vec<PreviewSection> {
        self.definition
            .sections()
            .iter()
            .map(|section| PreviewSection {
                title: section.title().to_string(),
                answers: visible_questions(section, &self.responses)
                    .map(|q| PreviewAnswer {
                        question: q.id().clone(),
                        prompt: q.prompt().to_string(),
                        answer: answer_for(q, &self.responses),
                    })
                    .collect(),
            })
            .collect()
    }

    // === Submitting ===

    /// Validate the whole form and hand the payload to the store.
    ///
    /// If any section has errors the session moves to the first such section,
    /// surfaces its errors and the store is never called. If the store fails,
    /// all answers are kept so the submit can be retried. On success the
    /// answers are cleared and the session accepts no further changes.
    pub fn submit<S: FormStore>(&mut self, store: &S) -> Result<SubmissionPayload, SubmitError> {
        match self.phase() {
            Phase::Submitted => return Err(SubmitError::AlreadySubmitted),
            Phase::Editing if self.config.require_preview => {
                return Err(SubmitError::PreviewRequired);
            }
            _ => {}
        }

        let payload = match assemble(&self.definition, &self.responses) {
            Ok(payload) => payload,
            Err(incomplete) => {
                self.navigator.set_phase(Phase::Editing);
                self.navigator.jump(incomplete.section);
                self.errors = incomplete.errors.clone();
                debug!(
                    section = incomplete.section,
                    errors = incomplete.errors.len(),
                    "submit blocked by validation"
                );
                return Err(incomplete.into());
            }
        };

        let form = self.definition.id();
        if let Err(err) = store.submit(form, &payload) {
            let err = StoreError::backend(err);
            warn!(form = %form, error = %err, "store rejected submission");
            return Err(SubmitError::RejectedExternal(err));
        }

        info!(form = %form, answers = payload.len(), "form submitted");
        self.navigator.set_phase(Phase::Submitted);
        self.responses.clear();
        self.errors = ValidationErrors::new();
        Ok(payload)
    }
}
