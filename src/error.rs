//! Error types shared by the playback engine and its backends.

use thiserror::Error;

/// Failures reported by a decode/render backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The locator could not be opened (missing file, bad path).
    #[error("failed to open {locator}: {reason}")]
    Open { locator: String, reason: String },

    /// The backend cannot handle this source (format, codec or remote scheme).
    #[error("unsupported source: {0}")]
    Unsupported(String),

    /// No usable output device.
    #[error("audio device unavailable: {0}")]
    Device(String),

    /// The handle refused a seek request.
    #[error("seek failed: {0}")]
    Seek(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// `true` when the error happened while binding a track, as opposed to a fault
    /// on a handle that was already playing.
    pub fn is_prepare_failure(&self) -> bool {
        matches!(
            self,
            BackendError::Open { .. } | BackendError::Unsupported(_) | BackendError::Io(_)
        )
    }
}

/// Failures of the [`Player`](crate::playback::Player) front door.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The session thread has exited; no more commands can be delivered.
    #[error("playback session is no longer running")]
    Disconnected,

    #[error("failed to spawn playback session thread: {0}")]
    Spawn(std::io::Error),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
