//! In-memory track library and the catalog search seam.

use tracing::debug;

use super::model::{Track, TrackId};

/// Anything that can answer a free-text search with playable tracks.
///
/// A remote catalog client implements this the same way the local store does:
/// results carry full identity and locator, so they can be loaded unchanged.
pub trait Catalog {
    fn search(&self, query: &str) -> Vec<Track>;
}

/// Tracks keyed by id, kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut store = Self::new();
        for t in tracks {
            store.add(t);
        }
        store
    }

    /// Insert `track`, replacing any stored track with the same id in place.
    /// Returns `true` when the id was not present before.
    pub fn add(&mut self, track: Track) -> bool {
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => {
                *existing = track;
                false
            }
            None => {
                debug!(id = %track.id, "track added to store");
                self.tracks.push(track);
                true
            }
        }
    }

    /// Remove the track with `id`. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &TrackId) -> Option<Track> {
        let pos = self.tracks.iter().position(|t| &t.id == id)?;
        debug!(%id, "track removed from store");
        Some(self.tracks.remove(pos))
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == id)
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn list(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Catalog for TrackStore {
    fn search(&self, query: &str) -> Vec<Track> {
        let query = query.trim().to_lowercase();
        self.tracks
            .iter()
            .filter(|t| {
                let haystack = format!("{} {}", t.artist, t.title).to_lowercase();
                fuzzy_match_positions_lower(&haystack, &query).is_some()
            })
            .cloned()
            .collect()
    }
}

/// Positions of `query_lower`'s chars appearing in order (not necessarily
/// contiguously) in `haystack_lower`, or `None` when they do not all appear.
pub(crate) fn fuzzy_match_positions_lower(
    haystack_lower: &str,
    query_lower: &str,
) -> Option<Vec<usize>> {
    let mut positions: Vec<usize> = Vec::new();
    let mut hay_iter = haystack_lower.chars().enumerate();

    for qc in query_lower.chars() {
        loop {
            match hay_iter.next() {
                Some((hi, hc)) if hc == qc => {
                    positions.push(hi);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}
