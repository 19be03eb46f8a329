use thiserror::Error;

/// Failure reported by a [`SearchClient`](crate::source::SearchClient).
///
/// Transport errors, timeouts and malformed responses all collapse into
/// this one shape at the engine boundary; the message is surfaced to the
/// caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{source_name} search failed: {message}")]
pub struct CollaboratorError {
    pub source_name: String,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// A date bound matched neither `DD/MM/YYYY HH:MM` nor `DD/MM/YYYY`.
    #[error("cannot parse date '{value}': expected {expected}")]
    DateFormat { value: String, expected: &'static str },
    /// The registry or blacklist lookup failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}
