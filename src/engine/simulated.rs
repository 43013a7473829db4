use super::backend::{
    Alternative, EngineError, EngineEvent, EngineEventSender, EngineOptions, EngineProvider,
    RecognitionEngine, RecognitionResult, ResultBatch,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// A scripted utterance replayed by the simulated engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Primary transcript
    pub text: String,

    /// Confidence of the primary transcript
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// Additional candidates reported with the final result
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

fn default_confidence() -> f32 {
    0.9
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: default_confidence(),
            alternatives: Vec::new(),
        }
    }

    /// Load a JSON array of utterances
    pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<Utterance>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Default time an utterance pass stays open before the engine ends it
pub const DEFAULT_PASS_LENGTH: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct PassState {
    listening: bool,
    pass: u64,
}

/// Recognition engine that replays a script, one utterance per listening pass
///
/// A pass emits `start`, progressively longer interim results (when enabled)
/// and a final result, then ends on its own after the pass length unless
/// `stop()` ends it first. Once the script is exhausted a pass reports
/// `no-speech` and stays open on the silent room until stopped.
pub struct SimulatedEngine {
    options: EngineOptions,
    pending_language: String,
    script: Arc<Mutex<VecDeque<Utterance>>>,
    events: EngineEventSender,
    state: Arc<Mutex<PassState>>,
    pass_length: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn emit(events: &EngineEventSender, event: EngineEvent) {
    // The receiver outlives the engine unless the session was dropped
    if events.send(event).is_err() {
        debug!("Session dropped; discarding simulated event");
    }
}

impl SimulatedEngine {
    pub fn new(
        options: EngineOptions,
        script: Arc<Mutex<VecDeque<Utterance>>>,
        events: EngineEventSender,
    ) -> Self {
        Self {
            pending_language: options.language.clone(),
            options,
            script,
            events,
            state: Arc::new(Mutex::new(PassState::default())),
            pass_length: DEFAULT_PASS_LENGTH,
        }
    }

    pub fn with_pass_length(mut self, pass_length: Duration) -> Self {
        self.pass_length = pass_length;
        self
    }

    /// Language tag of the most recent listening pass
    pub fn language(&self) -> &str {
        &self.options.language
    }

    pub fn is_listening(&self) -> bool {
        lock(&self.state).listening
    }

    fn replay(&self, utterance: Utterance) {
        if self.options.interim_results {
            let words: Vec<&str> = utterance.text.split_whitespace().collect();
            for end in 1..words.len() {
                let partial = words[..end].join(" ");
                emit(
                    &self.events,
                    EngineEvent::Result(ResultBatch::new(vec![RecognitionResult::interim(
                        partial,
                    )])),
                );
            }
        }

        let alternatives = if utterance.alternatives.is_empty() {
            Vec::new()
        } else {
            let mut candidates = vec![Alternative::new(
                utterance.text.clone(),
                utterance.confidence,
            )];
            candidates.extend(utterance.alternatives);
            candidates.truncate(self.options.max_alternatives.max(1));
            candidates
        };

        let result = RecognitionResult::finalized(utterance.text, utterance.confidence)
            .with_alternatives(alternatives);
        emit(&self.events, EngineEvent::Result(ResultBatch::new(vec![result])));
    }

    /// End `pass` after the pass length, unless it was stopped meanwhile
    fn finish_later(&self, pass: u64) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let pass_length = self.pass_length;

        let finish = async move {
            tokio::time::sleep(pass_length).await;
            let mut state = lock(&state);
            if state.listening && state.pass == pass {
                state.listening = false;
                emit(&events, EngineEvent::End);
            }
        };

        match Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(finish);
            }
            Err(_) => {
                debug!("No runtime; ending simulated pass immediately");
                let mut state = lock(&self.state);
                state.listening = false;
                emit(&self.events, EngineEvent::End);
            }
        }
    }
}

impl RecognitionEngine for SimulatedEngine {
    fn start(&mut self) -> Result<(), EngineError> {
        let pass = {
            let mut state = lock(&self.state);
            if state.listening {
                return Err(EngineError::AlreadyActive);
            }
            state.listening = true;
            state.pass += 1;
            state.pass
        };

        self.options.language = self.pending_language.clone();
        emit(&self.events, EngineEvent::Start);

        let next = lock(&self.script).pop_front();
        match next {
            Some(utterance) => {
                self.replay(utterance);
                self.finish_later(pass);
            }
            None => emit(&self.events, EngineEvent::Error("no-speech".to_string())),
        }

        Ok(())
    }

    fn stop(&mut self) {
        let mut state = lock(&self.state);
        if state.listening {
            state.listening = false;
            emit(&self.events, EngineEvent::End);
        }
    }

    fn set_language(&mut self, tag: &str) {
        self.pending_language = tag.to_string();
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

/// Provider handing out simulated engines that share one script
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    script: Arc<Mutex<VecDeque<Utterance>>>,
    pass_length: Duration,
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SimulatedProvider {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self {
            script: Arc::new(Mutex::new(utterances.into())),
            pass_length: DEFAULT_PASS_LENGTH,
        }
    }

    pub fn with_pass_length(mut self, pass_length: Duration) -> Self {
        self.pass_length = pass_length;
        self
    }

    pub fn pass_length(&self) -> Duration {
        self.pass_length
    }

    /// Number of utterances not yet replayed
    pub fn remaining(&self) -> usize {
        lock(&self.script).len()
    }
}

impl EngineProvider for SimulatedProvider {
    fn is_supported(&self) -> bool {
        true
    }

    fn create(
        &self,
        options: EngineOptions,
        events: EngineEventSender,
    ) -> Result<Box<dyn RecognitionEngine>, EngineError> {
        info!(
            "Creating simulated engine (language={}, utterances={})",
            options.language,
            self.remaining()
        );
        let engine = SimulatedEngine::new(options, Arc::clone(&self.script), events)
            .with_pass_length(self.pass_length);
        Ok(Box::new(engine))
    }
}
