use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Delays applied before re-invoking the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartPolicy {
    /// After the engine ends a pass on its own
    pub end_delay_ms: u64,

    /// After a `no-speech` error
    pub no_speech_delay_ms: u64,

    /// After a `network` error
    pub network_delay_ms: u64,

    /// After any unclassified error
    pub other_delay_ms: u64,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            end_delay_ms: 500,
            no_speech_delay_ms: 1000,
            network_delay_ms: 2000,
            other_delay_ms: 1000,
        }
    }
}

impl RestartPolicy {
    pub fn end_delay(&self) -> Duration {
        Duration::from_millis(self.end_delay_ms)
    }

    pub fn other_delay(&self) -> Duration {
        Duration::from_millis(self.other_delay_ms)
    }

    /// Delay for an error kind, or `None` if it must not be retried
    pub fn delay_for(&self, kind: &ErrorKind) -> Option<Duration> {
        if !kind.is_recoverable() {
            return None;
        }

        let ms = match kind {
            ErrorKind::NoSpeech => self.no_speech_delay_ms,
            ErrorKind::Network => self.network_delay_ms,
            _ => self.other_delay_ms,
        };
        Some(Duration::from_millis(ms))
    }
}

/// Identifies one armed restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestartToken(u64);

/// The single outstanding restart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRestart {
    pub token: RestartToken,
    pub due: Instant,
}

/// Owns at most one pending restart
///
/// Arming replaces whatever was pending, so a burst of `error` + `end` events
/// for the same cause collapses into one engine restart.
#[derive(Debug, Default)]
pub struct RestartScheduler {
    pending: Option<PendingRestart>,
    generation: u64,
}

impl RestartScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending restart and arm a new one `delay` from now
    pub fn schedule(&mut self, delay: Duration) -> PendingRestart {
        self.generation += 1;
        let pending = PendingRestart {
            token: RestartToken(self.generation),
            due: Instant::now() + delay,
        };
        self.pending = Some(pending);
        pending
    }

    /// Invalidate the pending restart, returning whether one existed
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn pending(&self) -> Option<PendingRestart> {
        self.pending
    }

    /// Consume the pending restart if `token` still identifies it
    pub fn take(&mut self, token: RestartToken) -> bool {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
