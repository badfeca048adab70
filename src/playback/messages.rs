use std::sync::mpsc::Sender;

use tracing::trace;

use crate::library::Track;

/// Tag assigned to each decode handle at creation; strictly increasing per session.
pub type Generation = u64;

/// Requests a surface can make of the session.
#[derive(Debug, Clone)]
pub enum Command {
    /// Play `track` with `playlist` as the new list. The cursor is found by identity;
    /// when `track` is not in `playlist` it plays as a list of one. If `track` is the
    /// one already loaded and paused this resumes instead of reloading.
    Load { track: Track, playlist: Vec<Track> },
    /// Resume the paused track.
    Resume,
    Pause,
    /// Pause when playing, resume when paused.
    TogglePause,
    /// Seek to an absolute position in milliseconds; clamped to the track.
    Seek(i64),
    /// Seek relative to the current position in milliseconds.
    SeekBy(i64),
    Next,
    Previous,
    Stop,
    /// Republish the current snapshot (for a surface that just attached).
    Refresh,
}

/// Asynchronous notifications from the decode backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSignal {
    /// The handle is prepared and can start. `duration_ms` is 0 when unknown.
    Ready { duration_ms: u64 },
    /// The track played to its end.
    Completed,
    /// Preparation or playback failed.
    Error(String),
    PositionReport { position_ms: u64, duration_ms: u64 },
}

/// Everything the session thread consumes, in arrival order.
#[derive(Debug)]
pub(crate) enum SessionMsg {
    Command(Command),
    Signal {
        generation: Generation,
        signal: BackendSignal,
    },
    Tick {
        generation: Generation,
    },
    Shutdown,
}

/// Notifier handed to the backend when a handle is opened.
///
/// Every signal it sends is tagged with that handle's generation, so signals from
/// a replaced handle are recognised and dropped by the session. Sending never
/// blocks and never fails loudly: once the session is gone signals are discarded.
#[derive(Debug, Clone)]
pub struct BackendSignals {
    generation: Generation,
    tx: Sender<SessionMsg>,
}

impl BackendSignals {
    pub(crate) fn new(generation: Generation, tx: Sender<SessionMsg>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn ready(&self, duration_ms: u64) {
        self.send(BackendSignal::Ready { duration_ms });
    }

    pub fn completed(&self) {
        self.send(BackendSignal::Completed);
    }

    pub fn error(&self, reason: impl Into<String>) {
        self.send(BackendSignal::Error(reason.into()));
    }

    pub fn position(&self, position_ms: u64, duration_ms: u64) {
        self.send(BackendSignal::PositionReport {
            position_ms,
            duration_ms,
        });
    }

    pub fn send(&self, signal: BackendSignal) {
        let msg = SessionMsg::Signal {
            generation: self.generation,
            signal,
        };
        if self.tx.send(msg).is_err() {
            trace!(generation = self.generation, "session closed, signal discarded");
        }
    }
}
