//! # campus-forms
//!
//! Dynamic form engine for feedback forms and surveys: conditional
//! visibility, per-section validation, section navigation, submission
//! assembly and an authoring builder. Presentation-agnostic.
//!
//! ## Usage
//!
//! ```rust
//! use campus_forms::{
//!     ChoiceQuestion, EngineConfig, FormDefinition, FormSession, MemoryStore, Question,
//!     QuestionKind, Section, Step, TextQuestion,
//! };
//!
//! let form = FormDefinition::from_sections(
//!     "feedback",
//!     "Course Feedback",
//!     vec![
//!         Section::new("course", "Course").with_question(
//!             Question::new(
//!                 "pace",
//!                 "How was the pace?",
//!                 QuestionKind::Radio(ChoiceQuestion::new(["Too slow", "Just right", "Too fast"]).unwrap()),
//!             )
//!             .required(),
//!         ),
//!         Section::new("extra", "Anything else?").with_question(Question::new(
//!             "comments",
//!             "Comments",
//!             QuestionKind::Text(TextQuestion::default()),
//!         )),
//!     ],
//! )
//! .unwrap();
//!
//! let mut session = FormSession::new(form, EngineConfig::default());
//! assert!(session.go_next().is_blocked());
//!
//! session.set_answer("pace", "Just right");
//! assert_eq!(session.go_next(), Step::Moved { from: 0, to: 1 });
//!
//! let store = MemoryStore::new();
//! let payload = session.submit(&store).unwrap();
//! assert_eq!(payload.to_json().unwrap(), serde_json::json!({ "pace": "Just right" }));
//! ```
//!
//! ## Pieces
//!
//! - [`visibility`] - whether a question is shown for the current answers
//! - [`validator`] - required-field and matrix-row checks per section
//! - [`FormSession`] - answers, navigation, preview and submit for one user
//! - [`submission`] - full-form validation and payload assembly
//! - [`FormBuilder`] - authoring edits with undo and redo
//! - [`MemoryStore`] - an in-memory [`FormStore`] for tests

// Re-export all types from campus-forms-types
pub use campus_forms_types::*;

mod config;
pub use config::{ConfigError, EngineConfig, HiddenAnswerPolicy};

pub mod visibility;

pub mod validator;
pub use validator::{FormValidation, validate_form, validate_section};

mod navigation;
pub use navigation::{Navigator, Phase, Step};

pub mod submission;
pub use submission::{Incomplete, SubmitError, assemble};

mod session;
pub use session::{FormSession, PreviewAnswer, PreviewSection};

mod builder;
pub use builder::{FormBuilder, MoveDirection, NEW_QUESTION_PROMPT};

mod memory_store;
pub use memory_store::MemoryStore;
