//! Authoring side: edits over a form definition with undo and redo.
//!
//! Every edit works on a copy of the current definition. A successful edit
//! commits the copy as a new immutable snapshot; a failed edit commits
//! nothing, so the definition is exactly what it was before the call.

use std::sync::Arc;

use tracing::debug;

use crate::{
    ChoiceQuestion, Condition, DefinitionError, EngineConfig, FormDefinition, FormId,
    MatrixQuestion, Question, QuestionId, QuestionKind, QuestionKindTag, Section, SectionId,
};

/// Direction of a move among siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Prompt given to freshly added questions.
pub const NEW_QUESTION_PROMPT: &str = "Untitled question";

/// Edits a form definition one snapshot at a time.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    current: Arc<FormDefinition>,
    undo: Vec<Arc<FormDefinition>>,
    redo: Vec<Arc<FormDefinition>>,
    rating_scale: u8,
}

impl FormBuilder {
    /// Start a new form with a single empty section.
    pub fn new(id: impl Into<FormId>, title: impl Into<String>) -> Self {
        Self::edit(FormDefinition::new(id, title))
    }

    /// Start editing an existing definition.
    pub fn edit(definition: impl Into<Arc<FormDefinition>>) -> Self {
        Self {
            current: definition.into(),
            undo: Vec::new(),
            redo: Vec::new(),
            rating_scale: EngineConfig::default().rating_scale,
        }
    }

    /// Take defaults for new questions from the configuration.
    pub fn with_config(mut self, config: &EngineConfig) -> Self {
        self.rating_scale = config.rating_scale;
        self
    }

    /// The current snapshot.
    pub fn definition(&self) -> &Arc<FormDefinition> {
        &self.current
    }

    /// Finish editing and return the current snapshot.
    pub fn finish(self) -> Arc<FormDefinition> {
        self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Restore the previous snapshot; returns `false` if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.redo.push(std::mem::replace(&mut self.current, previous));
        debug!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        true
    }

    /// Re-apply an undone snapshot; returns `false` if there is none.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(std::mem::replace(&mut self.current, next));
        debug!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        true
    }

    /// Run an edit on a copy and commit it if it succeeds.
    fn apply<T>(
        &mut self,
        edit: impl FnOnce(&mut FormDefinition) -> Result<T, DefinitionError>,
    ) -> Result<T, DefinitionError> {
        let mut next = FormDefinition::clone(&self.current);
        let out = edit(&mut next)?;
        self.commit(next);
        Ok(out)
    }

    /// Make `next` the current snapshot unless it equals the current one.
    fn commit(&mut self, next: FormDefinition) {
        if next != *self.current {
            self.undo.push(std::mem::replace(&mut self.current, Arc::new(next)));
            self.redo.clear();
            debug!(undo = self.undo.len(), "committed edit");
        }
    }

    // === Form ===

    pub fn set_title(&mut self, title: impl Into<String>) -> Arc<FormDefinition> {
        let mut next = FormDefinition::clone(&self.current);
        next.set_title(title);
        self.commit(next);
        self.current.clone()
    }

    // === Sections ===

    /// Append an empty section titled `Section {n+1}`; returns its id.
    pub fn add_section(&mut self) -> Result<SectionId, DefinitionError> {
        self.apply(|form| {
            let id = next_section_id(form);
            let title = format!("Section {}", form.section_count() + 1);
            form.push_section(Section::new(id.clone(), title))?;
            Ok(id)
        })
    }

    /// Delete a section; the only remaining section cannot be deleted.
    pub fn delete_section(&mut self, section: &SectionId) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| form.remove_section(section).map(drop))?;
        Ok(self.current.clone())
    }

    pub fn update_section(
        &mut self,
        section: &SectionId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let title = title.into();
        self.apply(|form| {
            let target = section_mut(form, section)?;
            target.set_title(title);
            target.set_description(description);
            Ok(())
        })?;
        Ok(self.current.clone())
    }

    /// Swap a section with its neighbor; a no-op at either end.
    pub fn move_section(
        &mut self,
        section: &SectionId,
        direction: MoveDirection,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            let index = form
                .section_index(section)
                .ok_or_else(|| DefinitionError::UnknownSection(section.clone()))?;
            if let Some(other) = neighbor(index, form.section_count(), direction) {
                form.swap_sections(index, other)?;
            }
            Ok(())
        })?;
        Ok(self.current.clone())
    }

    // === Questions ===

    /// Append a question of the given kind with kind-appropriate defaults; returns its id.
    pub fn add_question(
        &mut self,
        section: &SectionId,
        kind: QuestionKindTag,
    ) -> Result<QuestionId, DefinitionError> {
        let scale = self.rating_scale;
        self.apply(|form| {
            let id = next_question_id(form);
            let question = Question::new(
                id.clone(),
                NEW_QUESTION_PROMPT,
                QuestionKind::default_for(kind, scale),
            );
            form.push_question(section, question)?;
            Ok(id)
        })
    }

    pub fn delete_question(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            section_mut(form, section)?
                .remove_question(question)
                .ok_or_else(|| DefinitionError::UnknownQuestion(question.clone()))?;
            Ok(())
        })?;
        Ok(self.current.clone())
    }

    /// Swap a question with its neighbor; a no-op at either end.
    pub fn move_question(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        direction: MoveDirection,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            let target = section_mut(form, section)?;
            let index = target
                .position_of(question)
                .ok_or_else(|| DefinitionError::UnknownQuestion(question.clone()))?;
            if let Some(other) = neighbor(index, target.len(), direction) {
                target.swap_questions(index, other)?;
            }
            Ok(())
        })?;
        Ok(self.current.clone())
    }

    /// Edit prompt, required flag, help text or conditional of a question.
    pub fn edit_question(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        edit: impl FnOnce(&mut Question),
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| form.edit_question(section, question, edit))?;
        Ok(self.current.clone())
    }

    pub fn set_prompt(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        prompt: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let prompt = prompt.into();
        self.edit_question(section, question, |q| q.set_prompt(prompt))
    }

    pub fn set_required(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        required: bool,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.edit_question(section, question, |q| q.set_required(required))
    }

    pub fn set_conditional(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        conditional: Option<Condition>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.edit_question(section, question, |q| q.set_conditional(conditional))
    }

    /// Switch a question to another kind, keeping or seeding options as needed.
    pub fn change_kind(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        kind: QuestionKindTag,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.edit_question(section, question, |q| q.change_kind(kind))
    }

    // === Options ===

    pub fn add_option(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            with_choice(form, section, question, |choice| {
                choice.add_option();
                Ok(())
            })
        })?;
        Ok(self.current.clone())
    }

    pub fn update_option(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
        label: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let label = label.into();
        self.apply(|form| {
            with_choice(form, section, question, |choice| choice.update_option(index, label))
        })?;
        Ok(self.current.clone())
    }

    /// Delete an option; refused when only two are left.
    pub fn delete_option(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            with_choice(form, section, question, |choice| choice.remove_option(index).map(drop))
        })?;
        Ok(self.current.clone())
    }

    // === Matrix rows and columns ===

    pub fn add_matrix_row(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        label: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let label = label.into();
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| {
                matrix.add_row(label);
                Ok(())
            })
        })?;
        Ok(self.current.clone())
    }

    pub fn update_matrix_row(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
        label: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let label = label.into();
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| matrix.update_row(index, label))
        })?;
        Ok(self.current.clone())
    }

    pub fn delete_matrix_row(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| matrix.remove_row(index).map(drop))
        })?;
        Ok(self.current.clone())
    }

    pub fn add_matrix_column(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        label: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let label = label.into();
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| {
                matrix.add_column(label);
                Ok(())
            })
        })?;
        Ok(self.current.clone())
    }

    pub fn update_matrix_column(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
        label: impl Into<String>,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        let label = label.into();
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| matrix.update_column(index, label))
        })?;
        Ok(self.current.clone())
    }

    pub fn delete_matrix_column(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        index: usize,
    ) -> Result<Arc<FormDefinition>, DefinitionError> {
        self.apply(|form| {
            with_matrix(form, section, question, |matrix| matrix.remove_column(index).map(drop))
        })?;
        Ok(self.current.clone())
    }
}

fn neighbor(index: usize, len: usize, direction: MoveDirection) -> Option<usize> {
    match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|&i| i < len),
    }
}

/// Smallest `section-{n}` id above every existing one.
fn next_section_id(form: &FormDefinition) -> SectionId {
    let n = form
        .sections()
        .iter()
        .filter_map(|s| numeric_suffix(s.id().as_str(), "section-"))
        .max()
        .unwrap_or(0);
    SectionId::new(format!("section-{}", n + 1))
}

/// Smallest `q-{n}` id above every existing one.
fn next_question_id(form: &FormDefinition) -> QuestionId {
    let n = form
        .questions()
        .filter_map(|q| numeric_suffix(q.id().as_str(), "q-"))
        .max()
        .unwrap_or(0);
    QuestionId::new(format!("q-{}", n + 1))
}

fn numeric_suffix(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?.parse().ok()
}

fn section_mut<'a>(
    form: &'a mut FormDefinition,
    section: &SectionId,
) -> Result<&'a mut Section, DefinitionError> {
    form.section_by_id_mut(section)
        .ok_or_else(|| DefinitionError::UnknownSection(section.clone()))
}

fn with_choice<T>(
    form: &mut FormDefinition,
    section: &SectionId,
    question: &QuestionId,
    edit: impl FnOnce(&mut ChoiceQuestion) -> Result<T, DefinitionError>,
) -> Result<T, DefinitionError> {
    form.edit_question(section, question, |target| match target.kind_mut().choice_mut() {
        Some(choice) => edit(choice),
        None => Err(DefinitionError::NotAChoiceQuestion(question.clone())),
    })?
}

fn with_matrix<T>(
    form: &mut FormDefinition,
    section: &SectionId,
    question: &QuestionId,
    edit: impl FnOnce(&mut MatrixQuestion) -> Result<T, DefinitionError>,
) -> Result<T, DefinitionError> {
    form.edit_question(section, question, |target| match target.kind_mut().matrix_mut() {
        Some(matrix) => edit(matrix),
        None => Err(DefinitionError::NotAMatrixQuestion(question.clone())),
    })?
}
