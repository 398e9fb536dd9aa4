use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{AnswerKey, DefinitionError, FormId, Question, QuestionId, QuestionKind, Section, SectionId};

/// The top-level structure of a form: ordered sections of ordered questions.
///
/// A definition always holds at least one section, and question ids are
/// unique across the whole form. Both are checked on construction and when
/// deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFormDefinition")]
pub struct FormDefinition {
    id: FormId,

    title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Sections in presentation order.
    sections: Vec<Section>,
}

#[derive(Deserialize)]
struct RawFormDefinition {
    id: FormId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    sections: Vec<Section>,
}

impl TryFrom<RawFormDefinition> for FormDefinition {
    type Error = DefinitionError;

    fn try_from(raw: RawFormDefinition) -> Result<Self, Self::Error> {
        let mut definition = Self::from_sections(raw.id, raw.title, raw.sections)?;
        definition.description = raw.description;
        Ok(definition)
    }
}

/// An authoring problem that does not break the model but makes the form
/// behave oddly once published.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionIssue {
    #[error("matrix question '{0}' needs at least one row and one column")]
    MatrixNotRenderable(QuestionId),

    #[error("matrix question '{question}' has two rows stored under '{key}'")]
    DuplicateMatrixRow { question: QuestionId, key: AnswerKey },

    #[error("question '{question}' depends on unknown question '{depends_on}'")]
    UnknownDependency {
        question: QuestionId,
        depends_on: QuestionId,
    },

    #[error("question '{question}' depends on '{depends_on}', which is not asked before it")]
    ForwardDependency {
        question: QuestionId,
        depends_on: QuestionId,
    },

    #[error("question '{question}' depends on '{depends_on}', which has no single-value answer")]
    MultiValuedDependency {
        question: QuestionId,
        depends_on: QuestionId,
    },

    #[error("question '{question}' waits for '{value}', which is not an option of '{depends_on}'")]
    UnreachableCondition {
        question: QuestionId,
        depends_on: QuestionId,
        value: String,
    },
}

impl FormDefinition {
    /// Create a form with a single empty section.
    pub fn new(id: impl Into<FormId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            sections: vec![Section::new("section-1", "Section 1")],
        }
    }

    /// Create a form from prepared sections.
    pub fn from_sections(
        id: impl Into<FormId>,
        title: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<Self, DefinitionError> {
        if sections.is_empty() {
            return Err(DefinitionError::NoSections);
        }
        check_unique_ids(&sections)?;
        Ok(Self {
            id: id.into(),
            title: title.into(),
            description: None,
            sections,
        })
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &FormId {
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

    /// Get the sections.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the number of sections (never zero).
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Position of a section by id.
    pub fn section_index(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    pub fn section_by_id(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id() == id)
    }

    pub fn section_by_id_mut(&mut self, id: &SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id() == id)
    }

    /// Append a question to a section, rejecting an id already in the form.
    pub fn push_question(
        &mut self,
        section: &SectionId,
        question: Question,
    ) -> Result<(), DefinitionError> {
        if self.contains_question(question.id()) {
            return Err(DefinitionError::DuplicateQuestionId(question.id().clone()));
        }
        self.section_by_id_mut(section)
            .ok_or_else(|| DefinitionError::UnknownSection(section.clone()))?
            .push_question(question);
        Ok(())
    }

    /// Run `edit` on one question of a section.
    ///
    /// The question must keep its id; if `edit` replaces it with a question
    /// under another id, the original is put back and the edit is refused.
    pub fn edit_question<T>(
        &mut self,
        section: &SectionId,
        question: &QuestionId,
        edit: impl FnOnce(&mut Question) -> T,
    ) -> Result<T, DefinitionError> {
        let target = self
            .section_by_id_mut(section)
            .ok_or_else(|| DefinitionError::UnknownSection(section.clone()))?
            .question_mut(question)
            .ok_or_else(|| DefinitionError::UnknownQuestion(question.clone()))?;
        let original = target.clone();
        let output = edit(target);
        if target.id() != question {
            let renamed = target.id().clone();
            *target = original;
            return Err(DefinitionError::DuplicateQuestionId(renamed));
        }
        Ok(output)
    }

    /// Append a section, rejecting duplicate section or question ids.
    pub fn push_section(&mut self, section: Section) -> Result<(), DefinitionError> {
        self.sections.push(section);
        if let Err(err) = check_unique_ids(&self.sections) {
            self.sections.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Remove a section, refusing to remove the last one.
    pub fn remove_section(&mut self, id: &SectionId) -> Result<Section, DefinitionError> {
        let index = self
            .section_index(id)
            .ok_or_else(|| DefinitionError::UnknownSection(id.clone()))?;
        if self.sections.len() == 1 {
            return Err(DefinitionError::CannotDeleteLastSection);
        }
        Ok(self.sections.remove(index))
    }

    /// Swap two sections by position.
    pub fn swap_sections(&mut self, a: usize, b: usize) -> Result<(), DefinitionError> {
        let len = self.sections.len();
        for index in [a, b] {
            if index >= len {
                return Err(DefinitionError::IndexOutOfRange { index, len });
            }
        }
        self.sections.swap(a, b);
        Ok(())
    }

    /// Every question of the form, in presentation order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.sections.iter().flat_map(|s| s.questions().iter())
    }

    /// Find a question and the index of its section.
    pub fn find_question(&self, id: &QuestionId) -> Option<(usize, &Question)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(index, s)| s.question(id).map(|q| (index, q)))
    }

    /// Check if any section holds a question with this id.
    pub fn contains_question(&self, id: &QuestionId) -> bool {
        self.find_question(id).is_some()
    }

    /// List authoring problems worth fixing before publishing.
    pub fn check(&self) -> Vec<DefinitionIssue> {
        let mut issues = Vec::new();
        let order: HashMap<&QuestionId, usize> = self
            .questions()
            .enumerate()
            .map(|(position, q)| (q.id(), position))
            .collect();

        for (position, question) in self.questions().enumerate() {
            if let QuestionKind::Matrix(matrix) = question.kind() {
                if !matrix.is_renderable() {
                    issues.push(DefinitionIssue::MatrixNotRenderable(question.id().clone()));
                }
                let mut seen = HashSet::new();
                for key in question.answer_keys() {
                    if !seen.insert(key.clone()) {
                        issues.push(DefinitionIssue::DuplicateMatrixRow {
                            question: question.id().clone(),
                            key,
                        });
                    }
                }
            }

            let Some(condition) = question.conditional() else {
                continue;
            };
            let Some((_, target)) = self.find_question(&condition.depends_on) else {
                issues.push(DefinitionIssue::UnknownDependency {
                    question: question.id().clone(),
                    depends_on: condition.depends_on.clone(),
                });
                continue;
            };
            if order.get(target.id()).is_some_and(|&p| p >= position) {
                issues.push(DefinitionIssue::ForwardDependency {
                    question: question.id().clone(),
                    depends_on: condition.depends_on.clone(),
                });
            }
            if !target.kind().is_single_valued() {
                issues.push(DefinitionIssue::MultiValuedDependency {
                    question: question.id().clone(),
                    depends_on: condition.depends_on.clone(),
                });
            } else if let Some(choice) = target.kind().choice()
                && !choice.contains(&condition.equals)
            {
                issues.push(DefinitionIssue::UnreachableCondition {
                    question: question.id().clone(),
                    depends_on: condition.depends_on.clone(),
                    value: condition.equals.clone(),
                });
            }
        }
        issues
    }
}

fn check_unique_ids(sections: &[Section]) -> Result<(), DefinitionError> {
    let mut section_ids = HashSet::new();
    let mut question_ids = HashSet::new();
    for section in sections {
        if !section_ids.insert(section.id()) {
            return Err(DefinitionError::DuplicateSectionId(section.id().clone()));
        }
        for question in section.questions() {
            if !question_ids.insert(question.id()) {
                return Err(DefinitionError::DuplicateQuestionId(question.id().clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, MatrixQuestion, TextQuestion};

    fn text(id: &str) -> Question {
        Question::new(id, id, QuestionKind::Text(TextQuestion::default()))
    }

    #[test]
    fn new_has_one_section() {
        let form = FormDefinition::new("feedback", "Course Feedback");
        assert_eq!(form.section_count(), 1);
        assert_eq!(form.sections()[0].title(), "Section 1");
    }

    #[test]
    fn rejects_empty_section_list() {
        let err = FormDefinition::from_sections("f", "F", Vec::new()).unwrap_err();
        assert!(matches!(err, DefinitionError::NoSections));
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let sections = vec![
            Section::new("a", "A").with_question(text("q1")),
            Section::new("b", "B").with_question(text("q1")),
        ];
        let err = FormDefinition::from_sections("f", "F", sections).unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateQuestionId(id) if id.as_str() == "q1"));
    }

    #[test]
    fn last_section_cannot_be_removed() {
        let mut form = FormDefinition::new("f", "F");
        let id = form.sections()[0].id().clone();

        let err = form.remove_section(&id).unwrap_err();
        assert!(matches!(err, DefinitionError::CannotDeleteLastSection));
        assert_eq!(form.section_count(), 1);
    }

    #[test]
    fn push_section_rolls_back_on_duplicate() {
        let mut form = FormDefinition::new("f", "F");
        let err = form.push_section(Section::new("section-1", "Again")).unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateSectionId(_)));
        assert_eq!(form.section_count(), 1);
    }

    #[test]
    fn push_question_keeps_ids_unique() {
        let sections = vec![
            Section::new("a", "A").with_question(text("q1")),
            Section::new("b", "B"),
        ];
        let mut form = FormDefinition::from_sections("f", "F", sections).unwrap();
        let b = SectionId::new("b");

        let err = form.push_question(&b, text("q1")).unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateQuestionId(QuestionId::new("q1")));
        let err = form.push_question(&SectionId::new("zzz"), text("q2")).unwrap_err();
        assert_eq!(err, DefinitionError::UnknownSection(SectionId::new("zzz")));
        assert!(form.sections()[1].is_empty());

        form.push_question(&b, text("q2")).unwrap();
        assert_eq!(form.sections()[1].questions()[0].id().as_str(), "q2");
    }

    #[test]
    fn edit_question_restores_a_renamed_question() {
        let sections = vec![
            Section::new("a", "A").with_question(text("q1")).with_question(text("q2")),
        ];
        let mut form = FormDefinition::from_sections("f", "F", sections).unwrap();
        let a = SectionId::new("a");
        let q1 = QuestionId::new("q1");

        let required = form.edit_question(&a, &q1, |q| {
            q.set_required(true);
            q.is_required()
        });
        assert_eq!(required, Ok(true));

        let err = form.edit_question(&a, &q1, |q| *q = text("q2")).unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateQuestionId(QuestionId::new("q2")));
        let ids: Vec<_> = form.questions().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, ["q1", "q2"]);
        assert!(form.sections()[0].questions()[0].is_required());

        let err = form.edit_question(&a, &QuestionId::new("q9"), |_| ()).unwrap_err();
        assert_eq!(err, DefinitionError::UnknownQuestion(QuestionId::new("q9")));
    }

    #[test]
    fn find_question_reports_section() {
        let sections = vec![
            Section::new("a", "A").with_question(text("q1")),
            Section::new("b", "B").with_question(text("q2")),
        ];
        let form = FormDefinition::from_sections("f", "F", sections).unwrap();
        let (index, question) = form.find_question(&QuestionId::new("q2")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(question.prompt(), "q2");
    }

    #[test]
    fn check_flags_authoring_problems() {
        let attended = Question::new(
            "attended",
            "Did you attend?",
            QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"]).unwrap()),
        );
        let services = Question::new(
            "services",
            "Which services?",
            QuestionKind::Checkbox(ChoiceQuestion::placeholder()),
        );
        let sections = vec![
            Section::new("a", "A")
                .with_question(text("early").shown_when("attended", "Yes"))
                .with_question(attended)
                .with_question(services)
                .with_question(text("why").shown_when("attended", "Maybe"))
                .with_question(text("which").shown_when("services", "Option 1"))
                .with_question(text("ghost").shown_when("nobody", "x")),
            Section::new("b", "B").with_question(Question::new(
                "grid",
                "Grid",
                QuestionKind::Matrix(MatrixQuestion::new(["Wi-Fi", "wi fi"], Vec::<String>::new())),
            )),
        ];
        let form = FormDefinition::from_sections("f", "F", sections).unwrap();
        let issues = form.check();

        assert!(issues.contains(&DefinitionIssue::ForwardDependency {
            question: "early".into(),
            depends_on: "attended".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::UnreachableCondition {
            question: "why".into(),
            depends_on: "attended".into(),
            value: "Maybe".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::MultiValuedDependency {
            question: "which".into(),
            depends_on: "services".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::UnknownDependency {
            question: "ghost".into(),
            depends_on: "nobody".into(),
        }));
        assert!(issues.contains(&DefinitionIssue::MatrixNotRenderable("grid".into())));
        assert!(issues.contains(&DefinitionIssue::DuplicateMatrixRow {
            question: "grid".into(),
            key: "grid-wi-fi".into(),
        }));
        assert_eq!(issues.len(), 6);
    }

    #[test]
    fn deserializing_enforces_invariants() {
        let json = r#"{"id":"f","title":"F","sections":[]}"#;
        assert!(serde_json::from_str::<FormDefinition>(json).is_err());

        let json = r#"{
            "id": "f",
            "title": "F",
            "description": "Tell us",
            "sections": [{"id": "a", "title": "A", "questions": [
                {"id": "q1", "prompt": "Name", "kind": "text", "required": true}
            ]}]
        }"#;
        let form: FormDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(form.description(), Some("Tell us"));
        assert!(form.sections()[0].questions()[0].is_required());
    }
}
