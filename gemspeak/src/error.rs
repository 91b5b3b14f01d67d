//! Errors surfaced to whoever triggered a generation.
//!
//! Two kinds only: [`InputError`] is caught before anything leaves the
//! process, [`OperationalError`] covers everything after that point. Neither
//! is retried.

use std::io;

use crate::utils::wav::WavError;

/// A form field the user left empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter your Gemini API key in the sidebar.")]
    MissingApiKey,

    #[error("Please enter both a speaking style and script.")]
    MissingStyleOrScript,
}

/// Failure while talking to the API or writing the output file.
#[derive(Debug, thiserror::Error)]
pub enum OperationalError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),

    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("could not write WAV file: {0}")]
    Wav(#[from] WavError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("file task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Error: {0}")]
    Operational(#[from] OperationalError),
}

impl GenerateError {
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl From<WavError> for GenerateError {
    fn from(e: WavError) -> Self {
        Self::Operational(e.into())
    }
}

impl From<io::Error> for GenerateError {
    fn from(e: io::Error) -> Self {
        Self::Operational(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_show_the_bare_message() {
        let err = GenerateError::from(InputError::MissingApiKey);
        assert!(err.is_input());
        assert_eq!(
            err.to_string(),
            "Please enter your Gemini API key in the sidebar."
        );
    }

    #[test]
    fn operational_errors_carry_the_underlying_text() {
        let err = GenerateError::from(OperationalError::Api {
            status: 400,
            message: "API key not valid".into(),
        });
        assert!(!err.is_input());
        assert_eq!(err.to_string(), "Error: 400: API key not valid");
    }

    #[test]
    fn io_errors_are_operational() {
        let err = GenerateError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(!err.is_input());
        assert!(err.to_string().contains("disk full"));
    }
}
