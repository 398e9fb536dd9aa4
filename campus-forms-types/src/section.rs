use serde::{Deserialize, Serialize};

use crate::{DefinitionError, Question, QuestionId, SectionId};

/// An ordered, independently validated group of questions.
///
/// Feedback forms call this a section and surveys call it a page; the two
/// behave identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    id: SectionId,

    title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Questions in presentation order.
    #[serde(default)]
    questions: Vec<Question>,
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            questions: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a question.
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn id(&self) -> &SectionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Find a question by id.
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub(crate) fn question_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id() == id)
    }

    pub(crate) fn push_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    /// Remove a question by id.
    pub fn remove_question(&mut self, id: &QuestionId) -> Option<Question> {
        let index = self.position_of(id)?;
        Some(self.questions.remove(index))
    }

    /// Swap two questions by position.
    pub fn swap_questions(&mut self, a: usize, b: usize) -> Result<(), DefinitionError> {
        let len = self.questions.len();
        for index in [a, b] {
            if index >= len {
                return Err(DefinitionError::IndexOutOfRange { index, len });
            }
        }
        self.questions.swap(a, b);
        Ok(())
    }

    /// Position of a question within this section.
    pub fn position_of(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    /// Check if the section has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }
}
