//! Conditional visibility.
//!
//! A question without a conditional is always visible. A question with one is
//! visible only while the referenced question's stored answer is exactly the
//! expected string. Visibility does not chain: a dependency that is itself
//! hidden still counts through whatever answer it holds.

use crate::{AnswerKey, AnswerValue, Condition, FormDefinition, Question, Responses, Section};

/// Check if the condition holds for the current answers.
pub fn condition_met(condition: &Condition, responses: &Responses) -> bool {
    matches!(
        responses.get(&AnswerKey::question(&condition.depends_on)),
        Some(AnswerValue::Text(value)) if *value == condition.equals
    )
}

/// Check if a question is shown (and enforced) for the current answers.
pub fn is_visible(question: &Question, responses: &Responses) -> bool {
    question
        .conditional()
        .is_none_or(|condition| condition_met(condition, responses))
}

/// The questions of a section that are currently shown, in order.
pub fn visible_questions<'a>(
    section: &'a Section,
    responses: &'a Responses,
) -> impl Iterator<Item = &'a Question> + 'a {
    section
        .questions()
        .iter()
        .filter(move |q| is_visible(q, responses))
}

/// Answer keys that hold a value but belong to a hidden question.
pub fn hidden_answer_keys(definition: &FormDefinition, responses: &Responses) -> Vec<AnswerKey> {
    definition
        .questions()
        .filter(|q| !is_visible(q, responses))
        .flat_map(Question::answer_keys)
        .filter(|key| responses.contains(key))
        .collect()
}

/// Remove the answers of hidden questions until visibility settles.
///
/// Clearing one answer can hide further questions that depended on it, so
/// this repeats until a pass removes nothing. Returns the removed keys.
pub fn clear_hidden_answers(definition: &FormDefinition, responses: &mut Responses) -> Vec<AnswerKey> {
    let mut removed = Vec::new();
    loop {
        let hidden = hidden_answer_keys(definition, responses);
        if hidden.is_empty() {
            return removed;
        }
        for key in hidden {
            responses.remove(&key);
            removed.push(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChoiceQuestion, QuestionKind, TextQuestion};

    fn contact() -> Question {
        Question::new(
            "contact",
            "May we contact you?",
            QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"]).unwrap()),
        )
    }

    fn email() -> Question {
        Question::new("email", "Email", QuestionKind::Text(TextQuestion::default()))
            .required()
            .shown_when("contact", "Yes")
    }

    fn phone() -> Question {
        Question::new("phone", "Phone", QuestionKind::Text(TextQuestion::default()))
            .shown_when("email", "me@campus.edu")
    }

    fn form() -> FormDefinition {
        FormDefinition::from_sections(
            "f",
            "F",
            vec![Section::new("a", "A")
                .with_question(contact())
                .with_question(email())
                .with_question(phone())],
        )
        .unwrap()
    }

    #[test]
    fn unconditional_is_always_visible() {
        assert!(is_visible(&contact(), &Responses::new()));
    }

    #[test]
    fn strict_equality() {
        let mut responses = Responses::new();
        assert!(!is_visible(&email(), &responses));

        responses.insert("contact", "yes");
        assert!(!is_visible(&email(), &responses));

        responses.insert("contact", "Yes");
        assert!(is_visible(&email(), &responses));

        responses.insert("contact", vec!["Yes"]);
        assert!(!is_visible(&email(), &responses));
    }

    #[test]
    fn visible_questions_in_order() {
        let form = form();
        let mut responses = Responses::new();
        responses.insert("contact", "Yes");

        let ids: Vec<_> = visible_questions(&form.sections()[0], &responses)
            .map(|q| q.id().as_str())
            .collect();
        assert_eq!(ids, ["contact", "email"]);
    }

    #[test]
    fn hidden_answers_are_reported_but_kept() {
        let form = form();
        let mut responses = Responses::new();
        responses.insert("contact", "No");
        responses.insert("email", "me@campus.edu");

        assert_eq!(hidden_answer_keys(&form, &responses), [AnswerKey::new("email")]);
        assert!(responses.contains(&AnswerKey::new("email")));
    }

    #[test]
    fn clearing_cascades() {
        let form = form();
        let mut responses = Responses::new();
        responses.insert("contact", "No");
        responses.insert("email", "me@campus.edu");
        responses.insert("phone", "555-0100");

        let removed = clear_hidden_answers(&form, &mut responses);
        assert_eq!(removed, [AnswerKey::new("email"), AnswerKey::new("phone")]);
        assert_eq!(responses.len(), 1);
    }
}
