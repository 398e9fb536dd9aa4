//! Integration tests for form sessions.

use std::collections::BTreeMap;

use campus_forms::{
    AnswerKey, ChoiceQuestion, DEFAULT_MATRIX_COLUMNS, EngineConfig, FieldError, FormDefinition,
    FormId, FormSession, HiddenAnswerPolicy, MatrixQuestion, MemoryStore, PayloadValue, Phase,
    Question, QuestionId, QuestionKind, RatingQuestion, Responses, Section, Step, SubmitError,
    TextQuestion,
};

fn text(id: &str) -> Question {
    Question::new(id, id, QuestionKind::Text(TextQuestion::default()))
}

/// Sections [A(required q1), B(required q2)].
fn two_sections() -> FormDefinition {
    FormDefinition::from_sections(
        "two",
        "Two sections",
        vec![
            Section::new("a", "A").with_question(text("q1").required()),
            Section::new("b", "B").with_question(text("q2").required()),
        ],
    )
    .unwrap()
}

fn feedback() -> FormDefinition {
    FormDefinition::from_sections(
        "feedback",
        "Course Feedback",
        vec![
            Section::new("course", "Course")
                .with_question(
                    Question::new("overall", "Overall rating", QuestionKind::Rating(RatingQuestion::default()))
                        .required(),
                )
                .with_question(
                    Question::new(
                        "contact",
                        "May we contact you?",
                        QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"]).unwrap()),
                    )
                    .required(),
                )
                .with_question(text("email").required().shown_when("contact", "Yes")),
            Section::new("facilities", "Facilities").with_question(
                Question::new(
                    "facilities",
                    "Rate the facilities",
                    QuestionKind::Matrix(MatrixQuestion::new(
                        ["Library", "Labs", "Cafeteria"],
                        DEFAULT_MATRIX_COLUMNS,
                    )),
                )
                .required(),
            ),
            Section::new("extra", "Anything else?").with_question(text("comments")),
        ],
    )
    .unwrap()
}

fn rate_all_facilities(session: &mut FormSession) {
    let id = QuestionId::new("facilities");
    for (row, rank) in [("Library", 3), ("Labs", 4), ("Cafeteria", 2)] {
        session.set_matrix_rank(&id, row, rank);
    }
}

#[test]
fn next_is_blocked_until_section_validates() {
    let mut session = FormSession::new(feedback(), EngineConfig::default());

    assert_eq!(session.go_next(), Step::Blocked { errors: 2 });
    assert_eq!(session.current_index(), 0);
    assert_eq!(
        session.error_for(&AnswerKey::new("overall")),
        Some(FieldError::RequiredFieldMissing)
    );

    session.set_answer("overall", "5");
    session.set_answer("contact", "Yes");
    assert_eq!(session.go_next(), Step::Blocked { errors: 1 });
    assert!(session.errors().contains(&AnswerKey::new("email")));

    session.set_answer("email", "student@campus.edu");
    assert_eq!(session.go_next(), Step::Moved { from: 0, to: 1 });
    assert!(session.errors().is_empty());
}

#[test]
fn corrected_fields_clear_immediately() {
    let mut session = FormSession::new(feedback(), EngineConfig::default());
    session.go_next();
    assert_eq!(session.errors().len(), 2);

    session.set_answer("overall", "4");
    assert_eq!(session.errors().len(), 1);
    assert!(!session.errors().contains(&AnswerKey::new("overall")));
}

#[test]
fn back_navigation_is_free_and_clamped() {
    let mut session = FormSession::new(two_sections(), EngineConfig::default());
    assert_eq!(session.go_prev(), Step::Stayed);

    assert_eq!(session.go_to(1), Step::Moved { from: 0, to: 1 });
    assert_eq!(session.go_prev(), Step::Moved { from: 1, to: 0 });
    assert_eq!(session.current_index(), 0);
}

#[test]
fn progress_follows_position() {
    let mut session = FormSession::new(feedback(), EngineConfig::default());
    let third = 100.0 / 3.0;
    assert!((session.progress() - third).abs() < 1e-9);

    session.go_to(2);
    assert_eq!(session.progress(), 100.0);

    session.go_prev();
    assert!((session.progress() - 2.0 * third).abs() < 1e-9);
}

#[test]
fn next_on_last_section_stays() {
    let mut session = FormSession::new(two_sections(), EngineConfig::default());
    session.go_to(1);
    session.set_answer("q2", "done");
    assert_eq!(session.go_next(), Step::Stayed);
    assert_eq!(session.current_index(), 1);
}

#[test]
fn submit_lands_on_first_incomplete_section() {
    let store = MemoryStore::new();
    let mut session = FormSession::new(two_sections(), EngineConfig::default());
    session.go_to(1);
    session.set_answer("q2", "answered");

    let err = session.submit(&store).unwrap_err();
    let SubmitError::Incomplete(incomplete) = &err else {
        panic!("expected an incomplete form, got {err:?}");
    };
    assert_eq!(incomplete.section, 0);
    assert_eq!(session.current_index(), 0);
    assert_eq!(
        session.error_for(&AnswerKey::new("q1")),
        Some(FieldError::RequiredFieldMissing)
    );
    assert!(store.submissions().is_empty());
    assert!(!err.is_retryable());
}

#[test]
fn full_walkthrough_with_preview() {
    let store = MemoryStore::new();
    let config = EngineConfig::default().with_required_preview();
    let mut session = FormSession::new(feedback(), config);

    session.set_answer("overall", "4");
    session.set_answer("contact", "No");
    assert_eq!(session.go_next(), Step::Moved { from: 0, to: 1 });

    rate_all_facilities(&mut session);
    assert_eq!(session.request_preview(), Step::Stayed);
    assert_eq!(session.go_next(), Step::Moved { from: 1, to: 2 });

    assert!(matches!(session.submit(&store), Err(SubmitError::PreviewRequired)));
    assert_eq!(session.request_preview(), Step::Previewing);
    assert_eq!(session.phase(), Phase::Preview);

    // Preview is read-only.
    assert!(!session.set_answer("comments", "late"));
    assert_eq!(session.go_prev(), Step::Stayed);

    assert!(session.back_to_edit());
    assert_eq!(session.current_index(), 2);
    session.set_answer("comments", "Great course");
    session.request_preview();

    let preview = session.preview();
    assert_eq!(preview.len(), 3);
    let course: Vec<_> = preview[0].answers.iter().map(|a| a.question.as_str()).collect();
    assert_eq!(course, ["overall", "contact"]);
    assert_eq!(
        preview[1].answers[0].answer,
        Some(PayloadValue::Matrix(BTreeMap::from([
            ("Cafeteria".to_string(), "Fair".to_string()),
            ("Labs".to_string(), "Very Good".to_string()),
            ("Library".to_string(), "Good".to_string()),
        ])))
    );

    let payload = session.submit(&store).unwrap();
    assert_eq!(
        payload.to_json().unwrap(),
        serde_json::json!({
            "overall": "4",
            "contact": "No",
            "facilities": {"Library": "Good", "Labs": "Very Good", "Cafeteria": "Fair"},
            "comments": "Great course",
        })
    );
    assert!(session.is_submitted());
    assert!(session.responses().is_empty());
    assert_eq!(store.submissions(), [(FormId::new("feedback"), payload)]);

    assert!(matches!(session.submit(&store), Err(SubmitError::AlreadySubmitted)));
}

#[test]
fn external_failure_keeps_answers_for_retry() {
    let store = MemoryStore::new();
    let mut session = FormSession::new(two_sections(), EngineConfig::default());
    session.set_answer("q1", "one");
    session.set_answer("q2", "two");

    store.reject("backend unavailable");
    let err = session.submit(&store).unwrap_err();
    assert!(err.is_retryable());
    assert!(!session.is_submitted());
    assert_eq!(session.responses().len(), 2);

    store.accept();
    let payload = session.submit(&store).unwrap();
    assert_eq!(payload.len(), 2);
}

#[test]
fn hidden_answers_are_retained_by_default_but_never_submitted() {
    let store = MemoryStore::new();
    let mut session = FormSession::new(feedback(), EngineConfig::default());
    session.set_answer("overall", "3");
    session.set_answer("contact", "Yes");
    session.set_answer("email", "me@campus.edu");
    session.set_answer("contact", "No");

    assert!(session.responses().contains(&AnswerKey::new("email")));
    session.set_answer("contact", "Yes");
    assert_eq!(session.go_next(), Step::Moved { from: 0, to: 1 });

    session.set_answer("contact", "No");
    rate_all_facilities(&mut session);
    let payload = session.submit(&store).unwrap();
    assert!(!payload.contains("email"));
}

#[test]
fn clear_policy_drops_hidden_answers() {
    let config = EngineConfig::default().with_hidden_answers(HiddenAnswerPolicy::Clear);
    let mut session = FormSession::new(feedback(), config);
    session.set_answer("contact", "Yes");
    session.set_answer("email", "me@campus.edu");
    session.set_answer("contact", "No");

    assert!(!session.responses().contains(&AnswerKey::new("email")));
    session.set_answer("contact", "Yes");
    assert!(!session.responses().contains(&AnswerKey::new("email")));
}

#[test]
fn resume_from_saved_draft() {
    let mut draft = Responses::new();
    draft.insert("q1", "from yesterday");
    let json = serde_json::to_string(&draft).unwrap();

    let restored: Responses = serde_json::from_str(&json).unwrap();
    let mut session = FormSession::resume(two_sections(), restored, EngineConfig::default());
    assert_eq!(session.go_next(), Step::Moved { from: 0, to: 1 });
}

#[test]
fn visible_questions_follow_answers() {
    let mut session = FormSession::new(feedback(), EngineConfig::default());
    let ids = |s: &FormSession| -> Vec<String> {
        s.visible_questions().iter().map(|q| q.id().to_string()).collect()
    };
    assert_eq!(ids(&session), ["overall", "contact"]);

    session.set_answer("contact", "Yes");
    assert_eq!(ids(&session), ["overall", "contact", "email"]);
}

#[test]
fn checkbox_toggling() {
    let form = FormDefinition::from_sections(
        "services",
        "Services",
        vec![Section::new("a", "A").with_question(
            Question::new(
                "used",
                "Which services did you use?",
                QuestionKind::Checkbox(ChoiceQuestion::new(["Gym", "Library", "Clinic"]).unwrap()),
            )
            .required(),
        )],
    )
    .unwrap();
    let used = QuestionId::new("used");
    let mut session = FormSession::new(form, EngineConfig::default());

    assert!(session.toggle_choice(&used, "Gym"));
    assert!(!session.toggle_choice(&used, "Gym"));
    assert!(session.go_next().is_blocked());

    session.toggle_choice(&used, "Clinic");
    session.toggle_choice(&used, "Library");
    let payload = session.submit(&MemoryStore::new()).unwrap();
    assert_eq!(
        payload.get("used"),
        Some(&PayloadValue::Choices(vec!["Clinic".into(), "Library".into()]))
    );
}

#[test]
fn open_reports_missing_forms() {
    let store = MemoryStore::new().with_form(two_sections());
    assert!(FormSession::open(&store, &FormId::new("two"), EngineConfig::default()).is_ok());

    let err = FormSession::open(&store, &FormId::new("gone"), EngineConfig::default()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn out_of_range_ranks_are_refused_and_never_submitted() {
    let store = MemoryStore::new();
    let facilities = QuestionId::new("facilities");
    let columns = DEFAULT_MATRIX_COLUMNS.len();
    let mut session = FormSession::new(feedback(), EngineConfig::default());

    assert!(!session.set_matrix_rank(&facilities, "Labs", 0));
    assert!(!session.set_matrix_rank(&facilities, "Labs", columns + 1));
    assert!(!session.set_matrix_rank(&facilities, "Gym", 3));
    assert!(!session.set_matrix_rank(&QuestionId::new("overall"), "Labs", 3));
    assert!(session.responses().is_empty());

    // A saved draft can still carry a rank that names no column.
    let mut draft = Responses::new();
    for (key, answer) in [("overall", "4"), ("contact", "No")] {
        draft.insert(key, answer);
    }
    draft.set_matrix_rank(&facilities, "Library", 3);
    draft.set_matrix_rank(&facilities, "Labs", 0);
    draft.set_matrix_rank(&facilities, "Cafeteria", columns + 1);
    let mut session = FormSession::resume(feedback(), draft, EngineConfig::default());

    let err = session.submit(&store).unwrap_err();
    assert!(matches!(err, SubmitError::Incomplete(ref i) if i.section == 1));
    assert_eq!(session.current_index(), 1);
    assert_eq!(
        session.error_for(&AnswerKey::new("facilities-labs")),
        Some(FieldError::MatrixRowMissing)
    );
    assert!(session.errors().contains(&AnswerKey::new("facilities-cafeteria")));
    assert!(store.submissions().is_empty());
}
