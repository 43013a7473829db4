use crate::engine::EngineError;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors returned by session lifecycle operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Speech recognition is not supported in this environment")]
    UnsupportedEnvironment,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Session task is no longer running")]
    Closed,
}

/// Classification of an engine `error` event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Silence timeout
    NoSpeech,
    /// Transient loss of the recognition backend
    Network,
    /// No input device
    AudioCapture,
    /// Microphone permission denied
    NotAllowed,
    /// Anything else, with the raw classification string
    Other(String),
}

impl ErrorKind {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Fatal kinds recur immediately, so they are never retried
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AudioCapture | Self::NotAllowed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::Network => "network",
            Self::AudioCapture => "audio-capture",
            Self::NotAllowed => "not-allowed",
            Self::Other(raw) => raw,
        }
    }

    /// Hint for user-facing messaging
    pub fn user_action(&self) -> Option<&'static str> {
        match self {
            Self::AudioCapture => Some("No microphone found. Please check your device."),
            Self::NotAllowed => {
                Some("Microphone access denied. Please allow microphone permissions.")
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
