use crate::library::{Track, TrackId};

/// Ordered tracks plus a cursor. Navigation wraps in both directions.
///
/// The cursor is either `None` or a valid index into the track list.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list and put the cursor on the track whose id is `start`.
    ///
    /// Returns the new cursor, `None` when `start` is not in `tracks`.
    pub fn replace(&mut self, tracks: Vec<Track>, start: &TrackId) -> Option<usize> {
        self.current = tracks.iter().position(|t| &t.id == start);
        self.tracks = tracks;
        self.current
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// Move forward one track, wrapping from the last back to the first.
    /// Without a cursor this lands on the first track.
    pub fn advance(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(i) => (i + 1) % self.tracks.len(),
            None => 0,
        };
        self.current = Some(next);
        self.tracks.get(next)
    }

    /// Move back one track, wrapping from the first to the last.
    /// Without a cursor this lands on the last track.
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.tracks.len() - 1,
            Some(i) => i - 1,
        };
        self.current = Some(prev);
        self.tracks.get(prev)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter()
            .map(|id| Track::local(*id, Path::new("/music/x.mp3"), *id, ""))
            .collect()
    }

    fn ids(p: &Playlist) -> Option<String> {
        p.current_track().map(|t| t.id.to_string())
    }

    #[test]
    fn replace_locates_start_by_identity() {
        let mut p = Playlist::new();
        assert_eq!(p.replace(tracks(&["a", "b", "c"]), &TrackId::from("b")), Some(1));
        assert_eq!(ids(&p).as_deref(), Some("b"));

        assert_eq!(p.replace(tracks(&["a", "b"]), &TrackId::from("zzz")), None);
        assert!(p.current_track().is_none());
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn advance_and_retreat_wrap() {
        let mut p = Playlist::new();
        p.replace(tracks(&["a", "b", "c"]), &TrackId::from("b"));

        assert_eq!(p.advance().map(|t| t.id.to_string()).as_deref(), Some("c"));
        assert_eq!(p.advance().map(|t| t.id.to_string()).as_deref(), Some("a"));
        assert_eq!(p.retreat().map(|t| t.id.to_string()).as_deref(), Some("c"));
    }

    #[test]
    fn advancing_len_times_returns_to_start() {
        for len in 1..=6usize {
            let names: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            for start in 0..len {
                let mut p = Playlist::new();
                p.replace(tracks(&refs), &TrackId::from(refs[start]));
                for _ in 0..len {
                    p.advance();
                }
                assert_eq!(p.current_index(), Some(start), "len={len} start={start}");
            }
        }
    }

    #[test]
    fn retreat_then_advance_restores_index() {
        let all = ["a", "b", "c", "d"];
        for start in all {
            let mut p = Playlist::new();
            p.replace(tracks(&all), &TrackId::from(start));
            let before = p.current_index();

            p.retreat();
            p.advance();
            assert_eq!(p.current_index(), before);

            p.advance();
            p.retreat();
            assert_eq!(p.current_index(), before);
        }
    }

    #[test]
    fn empty_playlist_navigation_is_a_no_op() {
        let mut p = Playlist::new();
        assert!(p.advance().is_none());
        assert!(p.retreat().is_none());
        assert!(p.current_track().is_none());
        assert_eq!(p.current_index(), None);
    }

    #[test]
    fn navigation_without_cursor_starts_at_an_end() {
        let mut p = Playlist::new();
        p.replace(tracks(&["a", "b", "c"]), &TrackId::from("missing"));
        assert_eq!(p.clone().advance().map(|t| t.id.to_string()).as_deref(), Some("a"));
        assert_eq!(p.retreat().map(|t| t.id.to_string()).as_deref(), Some("c"));
    }
}
