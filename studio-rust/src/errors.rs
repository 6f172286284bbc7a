use crate::WizardStep;
use pixel_sprite_sdk::{ErrorClassifier, GenerationError, GenerationErrorKind};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage quota exceeded: {0} bytes requested")]
    QuotaExceeded(usize),
    #[error("Cannot {action} while at {from:?}")]
    InvalidTransition {
        from: WizardStep,
        action: &'static str,
    },
}

pub type StudioResult<T> = Result<T, StudioError>;

/// Problems shown to the user. None of them are fatal: each one is cleared by
/// retrying, starting over or updating the API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardError {
    #[error("Please describe a character or upload an image.")]
    MissingInput,
    #[error("Please enter your Gemini API Key to begin.")]
    MissingCredential,
    #[error("API request failed. Your key might be invalid, out of quota, or not enabled for this API. Please use the 'Change API Key' button below to correct it.")]
    CredentialRejected,
    #[error("An unexpected error occurred. Please try again.")]
    Unexpected,
}

impl WizardError {
    #[must_use]
    pub fn from_generation(error: &GenerationError, classifier: &ErrorClassifier) -> Self {
        match classifier.classify(error) {
            GenerationErrorKind::InvalidCredential | GenerationErrorKind::QuotaOrPermission => {
                Self::CredentialRejected
            }
            GenerationErrorKind::Unexpected => Self::Unexpected,
        }
    }

    /// Whether saving a new API key resolves this error.
    #[must_use]
    pub fn is_credential_related(self) -> bool {
        matches!(self, Self::MissingCredential | Self::CredentialRejected)
    }
}
