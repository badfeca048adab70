use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Stable, opaque identity of a track.
///
/// Two tracks are the same track when their ids match, even if their locators
/// differ (and vice versa).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Id for a file on disk, derived from its path so rescans agree.
    pub fn for_path(path: &Path) -> Self {
        Self(format!("file:{}", path.display()))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A playable track. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    /// Local path or remote URL handed to the backend.
    pub locator: String,
    pub title: String,
    pub artist: String,
    /// Display-only length (`m:ss`); may be stale or empty.
    pub duration_hint: String,
    pub album_art: Option<String>,
    /// Preformatted list text built from the configured display fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub is_remote: bool,
}

impl Track {
    /// A track backed by a file on disk.
    pub fn local(
        id: impl Into<TrackId>,
        path: &Path,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            locator: path.display().to_string(),
            title: title.into(),
            artist: artist.into(),
            duration_hint: String::new(),
            album_art: None,
            label: None,
            is_remote: false,
        }
    }

    /// A track streamed from `url` (e.g. a catalog preview).
    pub fn remote(
        id: impl Into<TrackId>,
        url: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        let locator = url.into();
        let is_remote = is_remote_locator(&locator);
        Self {
            id: id.into(),
            locator,
            title: title.into(),
            artist: artist.into(),
            duration_hint: String::new(),
            album_art: None,
            label: None,
            is_remote,
        }
    }

    pub fn with_duration_hint(mut self, hint: impl Into<String>) -> Self {
        self.duration_hint = hint.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label when one was set, else "Artist - Title", or just the title
    /// when the artist is blank.
    pub fn display(&self) -> String {
        if let Some(label) = self.label.as_deref().filter(|l| !l.trim().is_empty()) {
            return label.to_string();
        }
        match self.artist.trim() {
            "" => self.title.clone(),
            a => format!("{} - {}", a, self.title),
        }
    }
}

pub(crate) fn is_remote_locator(locator: &str) -> bool {
    let lower = locator.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
