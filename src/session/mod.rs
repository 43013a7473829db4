//! Transcription session management
//!
//! This module provides the `TranscriptionSession` abstraction that manages:
//! - The session lifecycle (start, pause, resume, stop)
//! - Routing engine events into the transcript
//! - Restarting the engine after it stops on its own
//! - Caller notifications and session statistics
//!
//! `spawn` runs a session on its own tokio task behind a `SessionHandle`.

mod config;
mod notify;
mod restart;
mod runner;
mod session;
mod stats;

pub use config::SessionConfig;
pub use notify::{EndCallback, ErrorCallback, TranscriptCallback, TranscriptUpdate};
pub use restart::{PendingRestart, RestartPolicy, RestartScheduler, RestartToken};
pub use runner::{spawn, SessionHandle};
pub use session::TranscriptionSession;
pub use stats::{SessionState, SessionStats};
