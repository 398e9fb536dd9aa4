use crate::{FormDefinition, FormId, SubmissionPayload};

/// Trait for the external persistence collaborator.
///
/// The engine only loads definitions and hands over finished payloads; how
/// and where they are stored is up to the implementation.
pub trait FormStore {
    /// The error type for this store.
    type Error: Into<anyhow::Error>;

    /// Retrieve a form definition.
    ///
    /// The store owns freshness; the engine does not cache definitions.
    fn load(&self, form: &FormId) -> Result<FormDefinition, Self::Error>;

    /// Durably record a submission.
    ///
    /// Only called with payloads that passed full-form validation. On error
    /// the caller keeps its answers so the submit can be retried.
    fn submit(&self, form: &FormId, payload: &SubmissionPayload) -> Result<(), Self::Error>;
}
