use super::config::SessionConfig;
use super::notify::{SessionCallbacks, TranscriptUpdate};
use super::restart::{PendingRestart, RestartScheduler, RestartToken};
use super::stats::{SessionState, SessionStats};
use crate::engine::{
    EngineError, EngineEvent, EngineEventSender, EngineEvents, EngineProvider, RecognitionEngine,
    ResultBatch,
};
use crate::error::{ErrorKind, SessionError};
use crate::transcript::{select_best, FinalizedSegment, TranscriptAccumulator, TranscriptSnapshot};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// A live transcription session over a discontinuous recognition engine
///
/// The engine stops on its own after silence, after an utterance or on
/// transient errors. The session restarts it behind the caller's back so the
/// transcript reads as one continuous recording.
///
/// All operations are synchronous. Engine events and restart expiries are fed
/// in through [`handle_event`](Self::handle_event) and
/// [`fire_restart`](Self::fire_restart), one at a time; see
/// [`spawn`](super::spawn) for the task that drives them.
pub struct TranscriptionSession {
    /// Session identifier for log correlation
    id: String,

    /// Session configuration
    config: SessionConfig,

    /// Host capability that builds the engine
    provider: Box<dyn EngineProvider>,

    /// Lazily constructed engine, exclusively owned
    engine: Option<Box<dyn RecognitionEngine>>,

    /// Handed to the engine on construction
    events_tx: EngineEventSender,

    state: SessionState,
    transcript: TranscriptAccumulator,
    restarts: RestartScheduler,
    callbacks: SessionCallbacks,

    /// Transcript returned by `stop()`, delivered once on the following `end`
    stopped_transcript: Option<String>,

    started_at: Option<DateTime<Utc>>,
    restarts_issued: usize,
    errors_seen: usize,
}

impl TranscriptionSession {
    /// Create a new session and the receiver its engine will report on
    pub fn new(config: SessionConfig, provider: Box<dyn EngineProvider>) -> (Self, EngineEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let id = format!("lecture-{}", uuid::Uuid::new_v4());

        info!("Creating transcription session: {}", id);

        let session = Self {
            id,
            config,
            provider,
            engine: None,
            events_tx,
            state: SessionState::Idle,
            transcript: TranscriptAccumulator::new(),
            restarts: RestartScheduler::new(),
            callbacks: SessionCallbacks::default(),
            stopped_transcript: None,
            started_at: None,
            restarts_issued: 0,
            errors_seen: 0,
        };

        (session, events_rx)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn language(&self) -> &str {
        &self.config.language
    }

    /// Whether the host offers speech recognition
    pub fn is_supported(&self) -> bool {
        self.provider.is_supported()
    }

    /// Register the transcript-update notification
    pub fn on_transcript_update(
        &mut self,
        callback: impl FnMut(&TranscriptUpdate) + Send + 'static,
    ) {
        self.callbacks.transcript = Some(Box::new(callback));
    }

    /// Register the error notification
    pub fn on_error(&mut self, callback: impl FnMut(&ErrorKind) + Send + 'static) {
        self.callbacks.error = Some(Box::new(callback));
    }

    /// Register the end-of-session notification
    pub fn on_end(&mut self, callback: impl FnMut(&str) + Send + 'static) {
        self.callbacks.end = Some(Box::new(callback));
    }

    /// Start recording
    pub fn start(&mut self) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Recording | SessionState::Paused) {
            warn!("Recording already started");
            return Ok(());
        }

        if !self.provider.is_supported() {
            warn!("Speech recognition is not supported; staying {}", self.state);
            return Err(SessionError::UnsupportedEnvironment);
        }

        info!("Starting transcription session: {}", self.id);

        self.transcript.clear();
        self.begin_listening()?;

        self.state = SessionState::Recording;
        self.stopped_transcript = None;
        self.started_at = Some(Utc::now());

        info!("Recording started (language={})", self.config.language);

        Ok(())
    }

    /// Pause recording; no-op unless recording
    pub fn pause(&mut self) {
        if self.state != SessionState::Recording {
            debug!("Pause ignored while {}", self.state);
            return;
        }

        // Cancel before stopping the engine so no restart can fire afterwards
        self.restarts.cancel();
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.state = SessionState::Paused;

        info!("Recording paused");
    }

    /// Resume a paused recording; no-op unless paused
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Paused {
            debug!("Resume ignored while {}", self.state);
            return Ok(());
        }

        self.begin_listening()?;
        self.state = SessionState::Recording;

        info!("Recording resumed");

        Ok(())
    }

    /// Stop recording and return the final transcript
    ///
    /// Returns an empty string without touching the engine unless recording
    /// or paused.
    pub fn stop(&mut self) -> String {
        if !matches!(self.state, SessionState::Recording | SessionState::Paused) {
            debug!("Stop ignored while {}", self.state);
            return String::new();
        }

        info!("Stopping transcription session: {}", self.id);

        self.restarts.cancel();
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
        }
        self.state = SessionState::Stopped;

        let transcript = self.transcript.final_text().to_string();
        self.stopped_transcript = Some(transcript.clone());

        info!(
            "Recording stopped ({} segments, {} restarts)",
            self.transcript.segments().len(),
            self.restarts_issued
        );

        transcript
    }

    /// Set the language tag; takes effect on the next engine start
    pub fn set_language(&mut self, tag: &str) {
        self.config.language = tag.to_string();
        if let Some(engine) = self.engine.as_mut() {
            engine.set_language(tag);
        }
        info!("Language set to: {}", tag);
    }

    /// Drop all finalized segments and the interim hypothesis
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Get current transcript projections
    pub fn snapshot(&self) -> TranscriptSnapshot {
        self.transcript.snapshot()
    }

    /// Get finalized segments in arrival order
    pub fn segments(&self) -> &[FinalizedSegment] {
        self.transcript.segments()
    }

    /// The restart armed by the scheduler, if any
    pub fn next_restart(&self) -> Option<PendingRestart> {
        self.restarts.pending()
    }

    /// Get current session statistics
    pub fn stats(&self) -> SessionStats {
        let duration_secs = self
            .started_at
            .map(|started| {
                Utc::now().signed_duration_since(started).num_milliseconds() as f64 / 1000.0
            })
            .unwrap_or(0.0);

        SessionStats {
            session_id: self.id.clone(),
            state: self.state,
            language: self.config.language.clone(),
            started_at: self.started_at,
            duration_secs,
            segments_count: self.transcript.segments().len(),
            restarts_count: self.restarts_issued,
            errors_count: self.errors_seen,
            restart_pending: self.restarts.pending().is_some(),
        }
    }

    /// Route one engine event
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Start => debug!("Speech recognition started"),
            EngineEvent::Result(batch) => self.handle_results(batch),
            EngineEvent::Error(raw) => self.handle_error(ErrorKind::classify(&raw)),
            EngineEvent::End => self.handle_end(),
        }
    }

    /// Fire an expired restart
    ///
    /// Stale tokens and restarts outliving the recording state are ignored.
    pub fn fire_restart(&mut self, token: RestartToken) {
        if !self.restarts.take(token) {
            debug!("Ignoring stale restart {:?}", token);
            return;
        }

        if self.state != SessionState::Recording {
            debug!("Restart expired while {}; not restarting", self.state);
            return;
        }

        match self.begin_listening() {
            Ok(()) => {
                self.restarts_issued += 1;
                info!("Recognition restarted (restart #{})", self.restarts_issued);
            }
            Err(e) => {
                warn!("Failed to restart recognition: {}", e);
                self.callbacks.error(&ErrorKind::Other(e.to_string()));
                self.schedule_restart(self.config.restart.other_delay());
            }
        }
    }

    fn handle_results(&mut self, batch: ResultBatch) {
        if self.state == SessionState::Stopped {
            debug!("Dropping results received after stop");
            return;
        }

        let max_alternatives = self.config.max_alternatives.max(1);
        let mut interim = String::new();
        let mut considered = Vec::new();

        for result in batch.fresh() {
            let capped = result.alternatives.len().min(max_alternatives);
            let candidates = &result.alternatives[..capped];
            considered.extend_from_slice(candidates);

            if result.is_final {
                let primary = result.primary();
                let best = select_best(&primary, candidates);
                debug!(
                    "Final: {} | Confidence: {:.2}%",
                    best.text,
                    best.confidence * 100.0
                );
                self.transcript.append_final(best.text.clone(), best.confidence);
            } else {
                interim.push_str(&result.text);
            }
        }

        self.transcript.set_interim(interim);

        let update = TranscriptUpdate {
            transcript: self.transcript.snapshot(),
            alternatives: considered,
        };
        self.callbacks.transcript_update(&update);
    }

    fn handle_error(&mut self, kind: ErrorKind) {
        self.errors_seen += 1;
        warn!("Speech recognition error: {}", kind);

        self.callbacks.error(&kind);

        if self.state != SessionState::Recording {
            return;
        }

        match self.config.restart.delay_for(&kind) {
            Some(delay) => self.schedule_restart(delay),
            None => warn!("Error {} is fatal; not restarting", kind),
        }
    }

    fn handle_end(&mut self) {
        debug!("Speech recognition ended");

        match self.state {
            SessionState::Recording => {
                debug!("Auto-restarting recognition");
                self.schedule_restart(self.config.restart.end_delay());
            }
            SessionState::Stopped => {
                if let Some(transcript) = self.stopped_transcript.take() {
                    self.callbacks.end(&transcript);
                }
            }
            SessionState::Idle | SessionState::Paused => {}
        }
    }

    fn schedule_restart(&mut self, delay: Duration) {
        let pending = self.restarts.schedule(delay);
        debug!("Restart {:?} scheduled in {:?}", pending.token, delay);
    }

    /// Issue the engine "begin listening" command, building the engine if needed
    fn begin_listening(&mut self) -> Result<(), SessionError> {
        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                let options = self.config.engine_options();
                match self.provider.create(options, self.events_tx.clone()) {
                    Ok(engine) => engine,
                    Err(EngineError::Unavailable(reason)) => {
                        warn!("Speech recognition is unavailable: {}", reason);
                        return Err(SessionError::UnsupportedEnvironment);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };
        let engine = self.engine.insert(engine);

        match engine.start() {
            Ok(()) => Ok(()),
            Err(EngineError::AlreadyActive) => {
                debug!("Engine {} already active; treating start as success", engine.name());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineOptions, RecognitionResult};

    struct SilentEngine;

    impl RecognitionEngine for SilentEngine {
        fn start(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        fn stop(&mut self) {}

        fn set_language(&mut self, _tag: &str) {}

        fn name(&self) -> &str {
            "silent"
        }
    }

    struct SilentProvider;

    impl EngineProvider for SilentProvider {
        fn is_supported(&self) -> bool {
            true
        }

        fn create(
            &self,
            _options: EngineOptions,
            _events: EngineEventSender,
        ) -> Result<Box<dyn RecognitionEngine>, EngineError> {
            Ok(Box::new(SilentEngine))
        }
    }

    fn session() -> TranscriptionSession {
        let (session, _events) =
            TranscriptionSession::new(SessionConfig::default(), Box::new(SilentProvider));
        session
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);

        session.start().unwrap();
        assert_eq!(session.state(), SessionState::Recording);

        session.pause();
        assert_eq!(session.state(), SessionState::Paused);

        session.resume().unwrap();
        assert_eq!(session.state(), SessionState::Recording);

        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn test_batch_interim_concatenates_non_final_results() {
        let mut session = session();
        session.start().unwrap();

        session.handle_event(EngineEvent::Result(ResultBatch::new(vec![
            RecognitionResult::finalized("done", 0.9),
            RecognitionResult::interim("still "),
            RecognitionResult::interim("going"),
        ])));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.final_text, "done ");
        assert_eq!(snapshot.interim, "still going");
    }

    #[test]
    fn test_result_index_skips_reported_results() {
        let mut session = session();
        session.start().unwrap();

        let batch = ResultBatch {
            result_index: 1,
            results: vec![
                RecognitionResult::finalized("already seen", 0.9),
                RecognitionResult::finalized("new", 0.8),
            ],
        };
        session.handle_event(EngineEvent::Result(batch));

        assert_eq!(session.snapshot().final_text, "new ");
    }

    #[test]
    fn test_blank_final_still_appended() {
        let mut session = session();
        session.start().unwrap();

        session.handle_event(EngineEvent::Result(ResultBatch::new(vec![
            RecognitionResult::finalized("a", 0.9),
            RecognitionResult::finalized("", 0.1),
            RecognitionResult::finalized("b", 0.8),
        ])));

        assert_eq!(session.segments().len(), 3);
        assert_eq!(session.segments()[1].text, "");
        assert_eq!(session.snapshot().final_text, "a  b ");
    }

    #[test]
    fn test_stats_track_restarts_and_errors() {
        let mut session = session();
        session.start().unwrap();

        session.handle_event(EngineEvent::Error("network".to_string()));
        let pending = session.next_restart().unwrap();
        session.fire_restart(pending.token);

        let stats = session.stats();
        assert_eq!(stats.errors_count, 1);
        assert_eq!(stats.restarts_count, 1);
        assert!(!stats.restart_pending);
        assert_eq!(stats.state, SessionState::Recording);
        assert!(stats.started_at.is_some());
    }
}
