use std::ops::ControlFlow;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, trace, warn};

use crate::error::BackendError;
use crate::library::{Track, TrackId};

use super::backend::{Backend, DecodeHandle};
use super::broadcast::StateBroadcaster;
use super::messages::{BackendSignal, BackendSignals, Command, Generation, SessionMsg};
use super::playlist::Playlist;
use super::state::{PlaybackState, SessionStatus};
use super::ticker::ProgressTicker;

/// Last published snapshot, readable without subscribing.
pub(crate) type SnapshotHandle = Arc<Mutex<PlaybackState>>;

struct LiveHandle<H> {
    generation: Generation,
    track_id: TrackId,
    handle: H,
}

/// The playback state machine.
///
/// Not thread-safe by itself: exactly one owner (the [`Player`](super::Player)
/// session thread, or a test) calls into it, one transition at a time. The
/// backend's asynchronous answers come back as messages on `tx` and are fed in
/// through [`handle_signal`](Self::handle_signal).
pub struct PlaybackSession<B: Backend> {
    backend: B,
    playlist: Playlist,
    live: Option<LiveHandle<B::Handle>>,
    status: SessionStatus,
    /// Track the session is bound to; survives an `Error` so surfaces can tell
    /// which track failed.
    track_id: Option<TrackId>,
    generation: Generation,
    position_ms: u64,
    duration_ms: u64,
    broadcaster: Arc<StateBroadcaster>,
    snapshot: SnapshotHandle,
    ticker: ProgressTicker,
    tx: Sender<SessionMsg>,
}

impl<B: Backend> PlaybackSession<B> {
    pub(crate) fn new(
        backend: B,
        broadcaster: Arc<StateBroadcaster>,
        snapshot: SnapshotHandle,
        tx: Sender<SessionMsg>,
    ) -> Self {
        Self::with_ticker(backend, broadcaster, snapshot, tx, ProgressTicker::new())
    }

    pub(crate) fn with_ticker(
        backend: B,
        broadcaster: Arc<StateBroadcaster>,
        snapshot: SnapshotHandle,
        tx: Sender<SessionMsg>,
        ticker: ProgressTicker,
    ) -> Self {
        Self {
            backend,
            playlist: Playlist::new(),
            live: None,
            status: SessionStatus::Idle,
            track_id: None,
            generation: 0,
            position_ms: 0,
            duration_ms: 0,
            broadcaster,
            snapshot,
            ticker,
            tx,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// Generation of the most recently created handle (0 before the first load).
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn has_handle(&self) -> bool {
        self.live.is_some()
    }

    pub fn ticker_running(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            active_track_index: self.playlist.current_index(),
            is_playing: self.status == SessionStatus::Playing,
            position_ms: self.position_ms,
            duration_ms: self.duration_ms,
            status: self.status,
            track_id: self.track_id.clone(),
        }
    }

    /// Dispatch one message from the session channel.
    pub(crate) fn handle(&mut self, msg: SessionMsg) -> ControlFlow<()> {
        match msg {
            SessionMsg::Command(cmd) => self.handle_command(cmd),
            SessionMsg::Signal { generation, signal } => self.handle_signal(generation, signal),
            SessionMsg::Tick { generation } => self.handle_tick(generation),
            SessionMsg::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    pub fn handle_command(&mut self, cmd: Command) {
        trace!(?cmd, status = ?self.status, "command");
        match cmd {
            Command::Load { track, playlist } => self.play(track, playlist),
            Command::Resume => self.resume(),
            Command::Pause => self.pause(),
            Command::TogglePause => self.toggle_pause(),
            Command::Seek(ms) => self.seek(ms),
            Command::SeekBy(delta) => self.seek_by(delta),
            Command::Next => self.advance_track(),
            Command::Previous => self.retreat_track(),
            Command::Stop => self.stop(),
            Command::Refresh => self.publish(),
        }
    }

    /// Play `track` within `playlist`, resuming rather than reloading when the
    /// same track is already loaded.
    ///
    /// Sameness is decided by comparing ids against the live handle's track, never
    /// against anything a surface remembers.
    pub fn play(&mut self, track: Track, playlist: Vec<Track>) {
        if self.playlist.replace(playlist, &track.id).is_none() {
            self.playlist.replace(vec![track.clone()], &track.id);
        }

        let already_loaded = self
            .live
            .as_ref()
            .is_some_and(|live| live.track_id == track.id);

        if already_loaded {
            match self.status {
                SessionStatus::Paused => return self.resume(),
                SessionStatus::Playing | SessionStatus::Loading => {
                    debug!(id = %track.id, "track already active");
                    return self.publish();
                }
                SessionStatus::Idle | SessionStatus::Error => {}
            }
        }

        self.load(track);
    }

    /// Bind a fresh handle to `track`, discarding the current one first.
    pub fn load(&mut self, track: Track) {
        self.release_handle();

        self.generation += 1;
        let generation = self.generation;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.track_id = Some(track.id.clone());

        let signals = BackendSignals::new(generation, self.tx.clone());
        match self.backend.open(&track.locator, signals) {
            Ok(handle) => {
                info!(generation, id = %track.id, locator = %track.locator, "loading track");
                self.live = Some(LiveHandle {
                    generation,
                    track_id: track.id,
                    handle,
                });
                self.status = SessionStatus::Loading;
                self.publish();
            }
            Err(e) => self.fail(generation, &failure_reason(&e)),
        }
    }

    pub fn resume(&mut self) {
        if self.status != SessionStatus::Paused {
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let generation = live.generation;
        match live.handle.start() {
            Ok(()) => {
                debug!(generation, "resumed");
                self.status = SessionStatus::Playing;
                self.ticker.start(generation, self.tx.clone());
                self.publish();
            }
            Err(e) => self.fail(generation, &failure_reason(&e)),
        }
    }

    pub fn pause(&mut self) {
        if self.status != SessionStatus::Playing {
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };

        let generation = live.generation;
        match live.handle.pause() {
            Ok(()) => {
                self.ticker.stop();
                self.position_ms = live.handle.position_ms();
                if let Some(d) = live.handle.duration_ms() {
                    self.duration_ms = d;
                }
                debug!(generation, position_ms = self.position_ms, "paused");
                self.status = SessionStatus::Paused;
                self.publish();
            }
            Err(e) => self.fail(generation, &failure_reason(&e)),
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.status {
            SessionStatus::Playing => self.pause(),
            SessionStatus::Paused => self.resume(),
            _ => {}
        }
    }

    /// Seek to `target_ms`, clamped to `[0, duration]` (`[0, ∞)` while the
    /// duration is unknown). Publishes right away, playing or paused. A seek the
    /// backend refuses keeps the track going at its current position.
    pub fn seek(&mut self, target_ms: i64) {
        if !matches!(self.status, SessionStatus::Playing | SessionStatus::Paused) {
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };

        if let Some(d) = live.handle.duration_ms() {
            self.duration_ms = d;
        }
        let target = clamp_seek(target_ms, self.duration_ms);
        let generation = live.generation;

        match live.handle.seek(target) {
            Ok(()) => {
                debug!(generation, target, "seek");
                self.position_ms = target;
                self.publish();
            }
            // A refused seek leaves the decoder where it was; report where that is.
            Err(BackendError::Seek(reason)) => {
                warn!(generation, target, %reason, "seek refused, staying put");
                self.position_ms = live.handle.position_ms();
                self.publish();
            }
            Err(e) => self.fail(generation, &failure_reason(&e)),
        }
    }

    /// Seek relative to the current position.
    pub fn seek_by(&mut self, delta_ms: i64) {
        let current = match (self.status, self.live.as_ref()) {
            (SessionStatus::Playing, Some(live)) => live.handle.position_ms(),
            _ => self.position_ms,
        };
        let current = i64::try_from(current).unwrap_or(i64::MAX);
        self.seek(current.saturating_add(delta_ms));
    }

    /// Move to the next track (wrapping) and load it. No-op on an empty playlist.
    pub fn advance_track(&mut self) {
        if let Some(track) = self.playlist.advance().cloned() {
            self.load(track);
        }
    }

    /// Move to the previous track (wrapping) and load it. No-op on an empty playlist.
    pub fn retreat_track(&mut self) {
        if let Some(track) = self.playlist.retreat().cloned() {
            self.load(track);
        }
    }

    /// Release the handle and go idle. The playlist and its cursor are kept.
    pub fn stop(&mut self) {
        self.release_handle();
        self.status = SessionStatus::Idle;
        self.track_id = None;
        self.position_ms = 0;
        self.duration_ms = 0;
        info!("stopped");
        self.publish();
    }

    /// Apply a backend signal tagged with `generation`; stale ones are dropped.
    pub fn handle_signal(&mut self, generation: Generation, signal: BackendSignal) {
        if !self.is_live(generation) {
            debug!(generation, current = self.generation, ?signal, "dropping stale signal");
            return;
        }

        match signal {
            BackendSignal::Ready { duration_ms } => self.on_ready(generation, duration_ms),
            BackendSignal::Completed => {
                info!(generation, "track completed");
                self.advance_track();
            }
            BackendSignal::Error(reason) => self.fail(generation, &reason),
            BackendSignal::PositionReport {
                position_ms,
                duration_ms,
            } => {
                if matches!(self.status, SessionStatus::Playing | SessionStatus::Paused) {
                    self.position_ms = position_ms;
                    if duration_ms > 0 {
                        self.duration_ms = duration_ms;
                    }
                    self.publish();
                }
            }
        }
    }

    /// Refresh position from the live handle, if the tick is current and we are playing.
    pub(crate) fn handle_tick(&mut self, generation: Generation) {
        if self.status != SessionStatus::Playing || !self.is_live(generation) {
            trace!(generation, "discarding tick");
            return;
        }
        if let Some(live) = self.live.as_ref() {
            self.position_ms = live.handle.position_ms();
            if let Some(d) = live.handle.duration_ms() {
                self.duration_ms = d;
            }
        }
        self.publish();
    }

    /// Release everything before the session goes away.
    pub(crate) fn shutdown(&mut self) {
        if self.live.is_some() || self.status != SessionStatus::Idle {
            self.stop();
        }
        self.ticker.stop();
    }

    fn on_ready(&mut self, generation: Generation, duration_ms: u64) {
        if self.status != SessionStatus::Loading {
            debug!(generation, status = ?self.status, "ignoring duplicate ready");
            return;
        }
        let Some(live) = self.live.as_mut() else {
            return;
        };

        match live.handle.start() {
            Ok(()) => {
                self.duration_ms = duration_ms;
                self.position_ms = 0;
                self.status = SessionStatus::Playing;
                info!(generation, duration_ms, "playing");
                self.ticker.start(generation, self.tx.clone());
                self.publish();
            }
            Err(e) => self.fail(generation, &failure_reason(&e)),
        }
    }

    /// Enter `Error`: no retry, no auto-advance.
    fn fail(&mut self, generation: Generation, reason: &str) {
        warn!(generation, reason, "playback failed");
        self.release_handle();
        self.status = SessionStatus::Error;
        self.publish();
    }

    fn is_live(&self, generation: Generation) -> bool {
        self.live
            .as_ref()
            .is_some_and(|live| live.generation == generation)
    }

    fn release_handle(&mut self) {
        self.ticker.stop();
        if let Some(mut live) = self.live.take() {
            debug!(generation = live.generation, id = %live.track_id, "releasing handle");
            live.handle.release();
        }
    }

    fn publish(&self) {
        let state = self.snapshot();
        if let Ok(mut latest) = self.snapshot.lock() {
            *latest = state.clone();
        }
        self.broadcaster.publish(&state);
    }
}

impl<B: Backend> Drop for PlaybackSession<B> {
    fn drop(&mut self) {
        self.release_handle();
    }
}

fn clamp_seek(target_ms: i64, duration_ms: u64) -> u64 {
    let target = u64::try_from(target_ms).unwrap_or(0);
    if duration_ms > 0 {
        target.min(duration_ms)
    } else {
        target
    }
}

/// Convert a backend failure into the reason string carried by `Error`.
fn failure_reason(e: &BackendError) -> String {
    if e.is_prepare_failure() {
        format!("prepare failed: {e}")
    } else {
        format!("playback fault: {e}")
    }
}

#[cfg(test)]
mod tests {
    use super::clamp_seek;

    #[test]
    fn clamp_seek_bounds() {
        assert_eq!(clamp_seek(-5, 1_000), 0);
        assert_eq!(clamp_seek(500, 1_000), 500);
        assert_eq!(clamp_seek(5_000, 1_000), 1_000);
        assert_eq!(clamp_seek(5_000, 0), 5_000);
        assert_eq!(clamp_seek(i64::MIN, 0), 0);
    }
}
