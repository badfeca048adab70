use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info};

use crate::error::{BackendError, PlayerError, Result};

use super::backend::Backend;
use super::broadcast::{StateBroadcaster, SubscriberId, Subscription};
use super::messages::{Command, SessionMsg};
use super::session::{PlaybackSession, SnapshotHandle};
use super::state::PlaybackState;

/// Front door to a playback session running on its own thread.
///
/// Every command and backend signal is handled on that one thread in arrival
/// order, so transitions never interleave. Cloning is not supported; share the
/// player behind an `Arc` if several surfaces need to send commands.
pub struct Player {
    tx: Sender<SessionMsg>,
    broadcaster: Arc<StateBroadcaster>,
    latest: SnapshotHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Spawn the session thread. `make_backend` runs on that thread, so the
    /// backend itself does not have to be `Send`.
    pub fn spawn<B, F>(make_backend: F) -> Result<Self>
    where
        B: Backend + 'static,
        F: FnOnce() -> std::result::Result<B, BackendError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SessionMsg>();
        let (init_tx, init_rx) = mpsc::channel::<std::result::Result<(), BackendError>>();
        let broadcaster = Arc::new(StateBroadcaster::new());
        let latest: SnapshotHandle = Arc::new(Mutex::new(PlaybackState::default()));

        let session_tx = tx.clone();
        let session_broadcaster = Arc::clone(&broadcaster);
        let session_latest = Arc::clone(&latest);

        let join = thread::Builder::new()
            .name("segue-session".into())
            .spawn(move || {
                let backend = match make_backend() {
                    Ok(b) => {
                        let _ = init_tx.send(Ok(()));
                        b
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                };

                let mut session =
                    PlaybackSession::new(backend, session_broadcaster, session_latest, session_tx);
                info!("playback session started");

                while let Ok(msg) = rx.recv() {
                    if session.handle(msg).is_break() {
                        break;
                    }
                }

                session.shutdown();
                info!("playback session finished");
            })
            .map_err(PlayerError::Spawn)?;

        match init_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = join.join();
                return Err(PlayerError::Backend(e));
            }
            Err(_) => {
                let _ = join.join();
                return Err(PlayerError::Disconnected);
            }
        }

        Ok(Self {
            tx,
            broadcaster,
            latest,
            join: Mutex::new(Some(join)),
        })
    }

    pub fn send(&self, cmd: Command) -> Result<()> {
        self.tx
            .send(SessionMsg::Command(cmd))
            .map_err(|_| PlayerError::Disconnected)
    }

    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.broadcaster.unsubscribe(id)
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> PlaybackState {
        self.latest
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Stop playback and wait for the session thread to exit. Safe to call twice.
    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionMsg::Shutdown);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                debug!("waiting for session thread");
                if h.join().is_err() {
                    error!("playback session thread panicked");
                }
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}
