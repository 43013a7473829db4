use super::session::TranscriptionSession;
use super::stats::{SessionState, SessionStats};
use crate::engine::EngineEvents;
use crate::error::SessionError;
use crate::transcript::TranscriptSnapshot;
use futures::future;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::sleep_until;
use tracing::{debug, info};

/// Commands forwarded from a [`SessionHandle`] to the session task
enum SessionCommand {
    Start(oneshot::Sender<Result<(), SessionError>>),
    Pause(oneshot::Sender<()>),
    Resume(oneshot::Sender<Result<(), SessionError>>),
    Stop(oneshot::Sender<String>),
    SetLanguage(String, oneshot::Sender<()>),
    Clear(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<TranscriptSnapshot>),
    State(oneshot::Sender<SessionState>),
    Stats(oneshot::Sender<SessionStats>),
}

/// Cloneable async handle to a running session
///
/// Every call returns once the command has been applied by the session task.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

/// Move a session onto its own task
///
/// The task applies caller commands, engine events and restart expiries one
/// at a time. It finishes, handing the session back, once every handle has
/// been dropped.
pub fn spawn(
    session: TranscriptionSession,
    events: EngineEvents,
) -> (SessionHandle, JoinHandle<TranscriptionSession>) {
    let (commands_tx, commands_rx) = mpsc::channel(32);
    let task = tokio::spawn(run(session, events, commands_rx));
    (SessionHandle { commands: commands_tx }, task)
}

async fn run(
    mut session: TranscriptionSession,
    mut events: EngineEvents,
    mut commands: mpsc::Receiver<SessionCommand>,
) -> TranscriptionSession {
    info!("Session task started: {}", session.id());

    loop {
        let pending = session.next_restart();
        let restart = async move {
            match pending {
                Some(pending) => {
                    sleep_until(pending.due).await;
                    pending.token
                }
                None => future::pending().await,
            }
        };

        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(command) => apply(&mut session, command),
                None => break,
            },
            Some(event) = events.recv() => session.handle_event(event),
            token = restart => session.fire_restart(token),
        }
    }

    info!("Session task stopped: {}", session.id());

    session
}

fn apply(session: &mut TranscriptionSession, command: SessionCommand) {
    // A dropped reply receiver only means the caller stopped waiting
    match command {
        SessionCommand::Start(reply) => {
            let _ = reply.send(session.start());
        }
        SessionCommand::Pause(reply) => {
            session.pause();
            let _ = reply.send(());
        }
        SessionCommand::Resume(reply) => {
            let _ = reply.send(session.resume());
        }
        SessionCommand::Stop(reply) => {
            let _ = reply.send(session.stop());
        }
        SessionCommand::SetLanguage(tag, reply) => {
            session.set_language(&tag);
            let _ = reply.send(());
        }
        SessionCommand::Clear(reply) => {
            session.clear();
            let _ = reply.send(());
        }
        SessionCommand::Snapshot(reply) => {
            let _ = reply.send(session.snapshot());
        }
        SessionCommand::State(reply) => {
            let _ = reply.send(session.state());
        }
        SessionCommand::Stats(reply) => {
            let _ = reply.send(session.stats());
        }
    }
}

impl SessionHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(command(reply_tx))
            .await
            .map_err(|_| SessionError::Closed)?;
        reply_rx.await.map_err(|_| {
            debug!("Session task dropped a reply");
            SessionError::Closed
        })
    }

    pub async fn start(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Start).await?
    }

    pub async fn pause(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Resume).await?
    }

    /// Stop recording and return the final transcript
    pub async fn stop(&self) -> Result<String, SessionError> {
        self.request(SessionCommand::Stop).await
    }

    pub async fn set_language(&self, tag: impl Into<String>) -> Result<(), SessionError> {
        let tag = tag.into();
        self.request(|reply| SessionCommand::SetLanguage(tag, reply))
            .await
    }

    pub async fn clear(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Clear).await
    }

    pub async fn snapshot(&self) -> Result<TranscriptSnapshot, SessionError> {
        self.request(SessionCommand::Snapshot).await
    }

    pub async fn state(&self) -> Result<SessionState, SessionError> {
        self.request(SessionCommand::State).await
    }

    pub async fn stats(&self) -> Result<SessionStats, SessionError> {
        self.request(SessionCommand::Stats).await
    }
}
