//! Error types for quakes.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in quakes operations.
#[derive(Error, Debug)]
pub enum QuakesError {
    /// Network or connection failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Webservice answered with something other than 200
    #[error("FDSN webservice error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected JSON structure
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint could not be turned into a request URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Settings file could not be read or written
    #[error("Settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings store rejected or could not encode a value
    #[error("Invalid settings: {0}")]
    Settings(String),
}

/// Coarse classification of a [`QuakesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    UnsuccessfulStatus,
    Decode,
    Settings,
}

impl QuakesError {
    /// Classify the error without inspecting its payload.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::UnsuccessfulStatus,
            Self::Decode(_) => FailureKind::Decode,
            Self::InvalidEndpoint(_) | Self::Io(_) | Self::Settings(_) => FailureKind::Settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let status = QuakesError::Status {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(status.kind(), FailureKind::UnsuccessfulStatus);
        assert_eq!(status.to_string(), "FDSN webservice error (HTTP 500): boom");

        let decode = serde_json::from_str::<serde_json::Value>("{nope")
            .map_err(QuakesError::from)
            .unwrap_err();
        assert_eq!(decode.kind(), FailureKind::Decode);

        assert_eq!(
            QuakesError::Settings("bad".into()).kind(),
            FailureKind::Settings
        );
    }
}
