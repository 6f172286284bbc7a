use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the provider was unexpected. (e.g. a candidate
    /// without inline image data)
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// Image data could not be decoded from its base64 or data URI form.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GenerationError {
    /// Classify the error with the default markers.
    #[must_use]
    pub fn kind(&self) -> GenerationErrorKind {
        ErrorClassifier::default().classify(self)
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;

/// Coarse classification of a failed generation call, used to decide what the
/// user is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// The credential was rejected by the provider.
    InvalidCredential,
    /// The credential is valid but lacks quota or permission for the model.
    QuotaOrPermission,
    Unexpected,
}

/// Matches error messages against marker substrings to tell credential
/// problems apart from everything else. Providers do not return a stable
/// error code for these, so the markers are plain configuration.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    credential_markers: Vec<String>,
    quota_markers: Vec<String>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(
            ["api key not valid", "api_key_invalid", "400"],
            [
                "permission denied",
                "permission_denied",
                "quota",
                "resource_exhausted",
                "403",
                "429",
            ],
        )
    }
}

impl ErrorClassifier {
    pub fn new<C, Q, S>(credential_markers: C, quota_markers: Q) -> Self
    where
        C: IntoIterator<Item = S>,
        Q: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lower = |s: S| s.into().to_lowercase();
        Self {
            credential_markers: credential_markers.into_iter().map(lower).collect(),
            quota_markers: quota_markers.into_iter().map(lower).collect(),
        }
    }

    #[must_use]
    pub fn classify(&self, error: &GenerationError) -> GenerationErrorKind {
        self.classify_message(&error.to_string())
    }

    /// Credential markers take precedence when both lists match.
    #[must_use]
    pub fn classify_message(&self, message: &str) -> GenerationErrorKind {
        let message = message.to_lowercase();
        if self
            .credential_markers
            .iter()
            .any(|marker| message.contains(marker.as_str()))
        {
            GenerationErrorKind::InvalidCredential
        } else if self
            .quota_markers
            .iter()
            .any(|marker| message.contains(marker.as_str()))
        {
            GenerationErrorKind::QuotaOrPermission
        } else {
            GenerationErrorKind::Unexpected
        }
    }
}
