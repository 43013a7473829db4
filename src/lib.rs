pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod session;
pub mod transcript;

pub use config::Config;
pub use engine::{
    Alternative, EngineError, EngineEvent, EngineOptions, EngineProvider, RecognitionEngine,
    RecognitionResult, ResultBatch, SimulatedProvider, Utterance,
};
pub use error::{ErrorKind, SessionError};
pub use language::{find_language, supported_languages, SupportedLanguage};
pub use session::{
    spawn, RestartPolicy, SessionConfig, SessionHandle, SessionState, SessionStats,
    TranscriptUpdate, TranscriptionSession,
};
pub use transcript::{select_best, FinalizedSegment, TranscriptAccumulator, TranscriptSnapshot};
