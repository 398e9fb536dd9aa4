//! Core types for the campus-forms engine.
//!
//! This crate provides the foundational types for defining and answering forms:
//! - `FormDefinition`, `Section` - The ordered structure of a form
//! - `Question` and `QuestionKind` - Individual questions and their types
//! - `Responses` and `AnswerKey` - In-progress answers and their keys
//! - `SubmissionPayload` - The flattened record handed to persistence
//! - `FormStore` trait - The boundary to the external persistence collaborator

mod ids;
pub use ids::{FormId, QuestionId, SectionId};

mod answer_key;
pub use answer_key::{AnswerKey, slugify};

mod answer_value;
pub use answer_value::AnswerValue;

mod responses;
pub use responses::{ResponseError, Responses};

mod question;
pub use question::{
    ChoiceQuestion, Condition, DEFAULT_MATRIX_COLUMNS, DEFAULT_RATING_SCALE, MIN_OPTIONS,
    MatrixQuestion, Question, QuestionKind, QuestionKindTag, RatingQuestion, TextQuestion,
};

mod section;
pub use section::Section;

mod form_definition;
pub use form_definition::{DefinitionIssue, FormDefinition};

mod validation;
pub use validation::ValidationErrors;

mod submission;
pub use submission::{PayloadValue, SubmissionPayload};

mod error;
pub use error::{DefinitionError, FieldError, StoreError};

mod traits;
pub use traits::FormStore;
