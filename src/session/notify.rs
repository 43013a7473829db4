use crate::engine::Alternative;
use crate::error::ErrorKind;
use crate::transcript::TranscriptSnapshot;
use serde::Serialize;

/// Payload of the transcript-update notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptUpdate {
    #[serde(flatten)]
    pub transcript: TranscriptSnapshot,

    /// Raw candidates considered for this batch, for diagnostics
    pub alternatives: Vec<Alternative>,
}

pub type TranscriptCallback = Box<dyn FnMut(&TranscriptUpdate) + Send>;
pub type ErrorCallback = Box<dyn FnMut(&ErrorKind) + Send>;
pub type EndCallback = Box<dyn FnMut(&str) + Send>;

/// Registered caller notifications
#[derive(Default)]
pub(crate) struct SessionCallbacks {
    pub transcript: Option<TranscriptCallback>,
    pub error: Option<ErrorCallback>,
    pub end: Option<EndCallback>,
}

impl SessionCallbacks {
    pub fn transcript_update(&mut self, update: &TranscriptUpdate) {
        if let Some(callback) = self.transcript.as_mut() {
            callback(update);
        }
    }

    pub fn error(&mut self, kind: &ErrorKind) {
        if let Some(callback) = self.error.as_mut() {
            callback(kind);
        }
    }

    pub fn end(&mut self, transcript: &str) {
        if let Some(callback) = self.end.as_mut() {
            callback(transcript);
        }
    }
}
