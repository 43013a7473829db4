// Recording engine shared by the integration tests
//
// Records every command the session issues and exposes the event sender so
// tests can play the engine's side of the conversation.

#![allow(dead_code)]

use lecture_scribe::engine::{
    EngineError, EngineEvent, EngineEventSender, EngineOptions, EngineProvider, RecognitionEngine,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A command observed by the recording engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// "begin listening", with the language in effect for the pass
    Start(String),
    Stop,
    SetLanguage(String),
}

#[derive(Clone, Default)]
pub struct EngineRecorder {
    commands: Arc<Mutex<Vec<Command>>>,
    events: Arc<Mutex<Option<EngineEventSender>>>,
    unsupported: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
    already_active: Arc<AtomicBool>,
    fail_starts: Arc<AtomicUsize>,
    created: Arc<AtomicUsize>,
}

impl EngineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsupported() -> Self {
        let recorder = Self::default();
        recorder.unsupported.store(true, Ordering::SeqCst);
        recorder
    }

    /// Claims support, but engine construction reports `Unavailable`
    pub fn unavailable() -> Self {
        let recorder = Self::default();
        recorder.unavailable.store(true, Ordering::SeqCst);
        recorder
    }

    pub fn provider(&self) -> Box<dyn EngineProvider> {
        Box::new(RecordingProvider {
            recorder: self.clone(),
        })
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn starts(&self) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, Command::Start(_)))
            .count()
    }

    pub fn stops(&self) -> usize {
        self.commands()
            .iter()
            .filter(|c| matches!(c, Command::Stop))
            .count()
    }

    pub fn engines_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Make every subsequent start report `AlreadyActive`
    pub fn report_already_active(&self) {
        self.already_active.store(true, Ordering::SeqCst);
    }

    /// Make the next `count` starts fail outright
    pub fn fail_next_starts(&self, count: usize) {
        self.fail_starts.store(count, Ordering::SeqCst);
    }

    /// Send an event as if the engine emitted it
    pub fn emit(&self, event: EngineEvent) {
        let events = self.events.lock().unwrap();
        events
            .as_ref()
            .expect("engine not created yet")
            .send(event)
            .expect("session dropped");
    }
}

struct RecordingProvider {
    recorder: EngineRecorder,
}

impl EngineProvider for RecordingProvider {
    fn is_supported(&self) -> bool {
        !self.recorder.unsupported.load(Ordering::SeqCst)
    }

    fn create(
        &self,
        options: EngineOptions,
        events: EngineEventSender,
    ) -> Result<Box<dyn RecognitionEngine>, EngineError> {
        if self.recorder.unavailable.load(Ordering::SeqCst) {
            return Err(EngineError::Unavailable("no recognizer installed".to_string()));
        }

        self.recorder.created.fetch_add(1, Ordering::SeqCst);
        *self.recorder.events.lock().unwrap() = Some(events);
        Ok(Box::new(RecordingEngine {
            recorder: self.recorder.clone(),
            language: options.language,
        }))
    }
}

struct RecordingEngine {
    recorder: EngineRecorder,
    language: String,
}

impl RecordingEngine {
    fn record(&self, command: Command) {
        self.recorder.commands.lock().unwrap().push(command);
    }
}

impl RecognitionEngine for RecordingEngine {
    fn start(&mut self) -> Result<(), EngineError> {
        self.record(Command::Start(self.language.clone()));

        let failing = self.recorder.fail_starts.load(Ordering::SeqCst);
        if failing > 0 {
            self.recorder.fail_starts.store(failing - 1, Ordering::SeqCst);
            return Err(EngineError::Failed("device busy".to_string()));
        }

        if self.recorder.already_active.load(Ordering::SeqCst) {
            return Err(EngineError::AlreadyActive);
        }

        Ok(())
    }

    fn stop(&mut self) {
        self.record(Command::Stop);
    }

    fn set_language(&mut self, tag: &str) {
        self.language = tag.to_string();
        self.record(Command::SetLanguage(tag.to_string()));
    }

    fn name(&self) -> &str {
        "recording"
    }
}
