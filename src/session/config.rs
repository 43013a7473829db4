use super::restart::RestartPolicy;
use crate::engine::EngineOptions;
use serde::{Deserialize, Serialize};

/// Configuration for a transcription session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Language tag handed to the engine (e.g., "en-US", "ur-PK")
    pub language: String,

    /// Ask the engine to keep listening across utterances
    pub continuous: bool,

    /// Ask the engine for interim results
    pub interim_results: bool,

    /// Candidates considered per finalized result
    /// Default: 3
    pub max_alternatives: usize,

    /// Restart delays
    pub restart: RestartPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
            max_alternatives: 3,
            restart: RestartPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            language: self.language.clone(),
            continuous: self.continuous,
            interim_results: self.interim_results,
            max_alternatives: self.max_alternatives.max(1),
        }
    }
}
