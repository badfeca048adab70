use serde::Serialize;

use crate::library::TrackId;

/// Where the session is in its lifecycle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// No decode handle.
    #[default]
    Idle,
    /// Handle created, waiting for the backend to report ready.
    Loading,
    Playing,
    Paused,
    /// The current track failed. Loading any track recovers.
    Error,
}

/// Snapshot of the session published to subscribers.
///
/// This is the only thing surfaces ever see; they never touch a decode handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Playlist cursor, `None` when no track is active.
    pub active_track_index: Option<usize>,
    pub is_playing: bool,
    pub position_ms: u64,
    /// `0` when unknown.
    pub duration_ms: u64,
    pub status: SessionStatus,
    /// Identity of the track the session is bound to.
    pub track_id: Option<TrackId>,
}
