use campus_forms::{
    ChoiceQuestion, DEFAULT_MATRIX_COLUMNS, DefinitionError, FormDefinition, MatrixQuestion,
    Question, QuestionKind, RatingQuestion, Section, TextQuestion,
};

/// End-of-term course feedback.
///
/// Three sections: the course itself (with an email field shown only when
/// the student agrees to be contacted), a facilities matrix, and free-form
/// comments.
pub fn course_feedback() -> Result<FormDefinition, DefinitionError> {
    let course = Section::new("course", "The course")
        .with_description("How did the course go overall?")
        .with_question(
            Question::new(
                "overall",
                "Overall rating",
                QuestionKind::Rating(RatingQuestion::default()),
            )
            .required(),
        )
        .with_question(
            Question::new(
                "pace",
                "How was the pace?",
                QuestionKind::Radio(ChoiceQuestion::new(["Too slow", "Just right", "Too fast"])?),
            )
            .required(),
        )
        .with_question(
            Question::new(
                "contact",
                "May we contact you about your answers?",
                QuestionKind::Radio(ChoiceQuestion::new(["Yes", "No"])?),
            )
            .required(),
        )
        .with_question(
            Question::new(
                "email",
                "Your email address",
                QuestionKind::Text(TextQuestion::default()),
            )
            .required()
            .shown_when("contact", "Yes"),
        );

    let facilities = Section::new("facilities", "Facilities").with_question(
        Question::new(
            "facilities",
            "Rate the facilities you used",
            QuestionKind::Matrix(MatrixQuestion::new(
                ["Library", "Labs", "Lecture Halls"],
                DEFAULT_MATRIX_COLUMNS,
            )),
        )
        .required()
        .with_help_text("One rating per row."),
    );

    let comments = Section::new("comments", "Anything else?").with_question(Question::new(
        "comments",
        "Comments",
        QuestionKind::Text(TextQuestion { multiline: true }),
    ));

    FormDefinition::from_sections(
        "course-feedback",
        "Course Feedback",
        vec![course, facilities, comments],
    )
    .map(|form| form.with_description("Anonymous unless you leave an email."))
}
