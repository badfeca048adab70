//! One-line rendering of a playback snapshot.

use std::time::Duration;

use segue::library::{Track, format_duration};
use segue::playback::{PlaybackState, SessionStatus};

fn icon(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "■",
        SessionStatus::Loading => "…",
        SessionStatus::Playing => "▶",
        SessionStatus::Paused => "⏸",
        SessionStatus::Error => "✖",
    }
}

fn clock(ms: u64) -> String {
    if ms == 0 {
        "-:--".to_string()
    } else {
        format_duration(Duration::from_millis(ms))
    }
}

/// `▶ 3 Title - Artist  1:02 / 3:45`. The track is looked up by id so the line
/// stays right even when the session plays a list other than `tracks`.
pub fn status_line(state: &PlaybackState, tracks: &[Track]) -> String {
    let icon = icon(state.status);
    let Some(id) = state.track_id.as_ref() else {
        return format!("{icon} stopped");
    };

    let name = tracks
        .iter()
        .find(|t| &t.id == id)
        .map(Track::display)
        .unwrap_or_else(|| id.to_string());
    let index = state
        .active_track_index
        .map(|i| (i + 1).to_string())
        .unwrap_or_default();

    let mut line = format!(
        "{icon} {index} {name}  {} / {}",
        format_duration(Duration::from_millis(state.position_ms)),
        clock(state.duration_ms)
    );
    if state.status == SessionStatus::Error {
        line.push_str("  (playback failed)");
    }
    line
}
