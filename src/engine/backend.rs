use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One candidate transcription for a single result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    /// Candidate text
    pub text: String,

    /// Confidence score (0.0 to 1.0)
    pub confidence: f32,
}

impl Alternative {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A single recognition result as emitted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Primary (index 0) transcript
    pub text: String,

    /// Confidence of the primary transcript
    #[serde(default)]
    pub confidence: f32,

    /// Whether the engine considers this result settled
    pub is_final: bool,

    /// Ranked candidate list, possibly empty
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

impl RecognitionResult {
    /// Non-final result carrying only a primary transcript
    pub fn interim(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: 0.0,
            is_final: false,
            alternatives: Vec::new(),
        }
    }

    /// Final result without an alternative list
    pub fn finalized(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            is_final: true,
            alternatives: Vec::new(),
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<Alternative>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// The primary transcript as a candidate
    pub fn primary(&self) -> Alternative {
        Alternative::new(self.text.clone(), self.confidence)
    }
}

/// A batch of results delivered by one `result` event
///
/// Results before `result_index` were already reported by an earlier batch
/// of the same listening pass and are skipped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultBatch {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

impl ResultBatch {
    pub fn new(results: Vec<RecognitionResult>) -> Self {
        Self {
            result_index: 0,
            results,
        }
    }

    /// Results not yet seen by the session
    pub fn fresh(&self) -> &[RecognitionResult] {
        let start = self.result_index.min(self.results.len());
        &self.results[start..]
    }
}

/// Events emitted asynchronously by a recognition engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The engine began a listening pass
    Start,
    /// New or updated results
    Result(ResultBatch),
    /// The engine reported an error (classification string)
    Error(String),
    /// The listening pass is over
    End,
}

/// Sending half of the engine event channel
pub type EngineEventSender = mpsc::UnboundedSender<EngineEvent>;

/// Receiving half of the engine event channel
pub type EngineEvents = mpsc::UnboundedReceiver<EngineEvent>;

/// Options handed to the engine at construction
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Language tag (e.g., "en-US")
    pub language: String,

    /// Keep listening across utterances
    pub continuous: bool,

    /// Emit non-final results while speech is in progress
    pub interim_results: bool,

    /// Number of candidates requested per result
    pub max_alternatives: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 3,
        }
    }
}

/// Errors raised synchronously by engine commands
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Recognition engine is already listening")]
    AlreadyActive,

    #[error("Speech recognition is not available: {0}")]
    Unavailable(String),

    #[error("Recognition engine failure: {0}")]
    Failed(String),
}

/// Speech recognition engine trait
///
/// Commands return immediately; their effects are observed later through
/// `EngineEvent`s on the channel the engine was created with.
pub trait RecognitionEngine: Send {
    /// Begin a listening pass
    ///
    /// Returns `EngineError::AlreadyActive` if a pass is still running.
    fn start(&mut self) -> Result<(), EngineError>;

    /// Stop the current listening pass, if any
    fn stop(&mut self);

    /// Change the language tag used by the next listening pass
    fn set_language(&mut self, tag: &str);

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Host capability that constructs recognition engines
pub trait EngineProvider: Send {
    /// Whether the host offers speech recognition at all
    fn is_supported(&self) -> bool;

    /// Create an engine that reports its events on `events`
    fn create(
        &self,
        options: EngineOptions,
        events: EngineEventSender,
    ) -> Result<Box<dyn RecognitionEngine>, EngineError>;
}
