//! Engine configuration.
//!
//! ```
//! use campus_forms::{EngineConfig, HiddenAnswerPolicy};
//!
//! let config = EngineConfig::from_json_str(r#"{"hidden_answers": "clear"}"#).unwrap();
//! assert_eq!(config.hidden_answers, HiddenAnswerPolicy::Clear);
//! assert!(!config.require_preview);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_RATING_SCALE;

/// What happens to the answer of a question that becomes hidden.
///
/// Hidden questions never reach the submission payload under either policy;
/// the policy only decides whether the answer reappears when the question
/// becomes visible again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAnswerPolicy {
    /// Keep the stored answer.
    #[default]
    Retain,

    /// Drop the stored answer after every change that hides the question.
    Clear,
}

/// Error loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cannot read engine configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Behavior switches for form sessions and the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub hidden_answers: HiddenAnswerPolicy,

    /// Only accept a submit from the preview pseudo-state.
    pub require_preview: bool,

    /// Scale of rating questions created by the builder.
    pub rating_scale: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hidden_answers: HiddenAnswerPolicy::default(),
            require_preview: false,
            rating_scale: DEFAULT_RATING_SCALE,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_hidden_answers(mut self, policy: HiddenAnswerPolicy) -> Self {
        self.hidden_answers = policy;
        self
    }

    pub fn with_required_preview(mut self) -> Self {
        self.require_preview = true;
        self
    }
}
