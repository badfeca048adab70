use std::path::Path;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::{display_from_fields, format_duration};
use super::model::{Track, TrackId};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Build a `Track` for one file, reading tags when the file has any.
fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration_hint = String::new();

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            duration_hint = format_duration(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    title = v.trim().to_string();
                }
                artist = tag.artist().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
                album = tag.album().map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    let label = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track::local(TrackId::for_path(path), path, title, artist.unwrap_or_default())
        .with_duration_hint(duration_hint)
        .with_label(label)
}

/// Walk `dir` and return every audio file as a `Track`, sorted case-insensitively by label.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<Track> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| {
            let path = e.path();
            path.is_file()
                && (settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, settings)
        })
        .map(|e| read_track(e.path(), settings))
        .collect();

    tracks.sort_by_cached_key(|t| t.display().to_lowercase());
    debug!(dir = %dir.display(), count = tracks.len(), "library scan finished");
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackDisplayField;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let settings = LibrarySettings {
            display_fields: vec![TrackDisplayField::Title],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "A");
        assert_eq!(tracks[1].title, "b");
        assert!(tracks.iter().all(|t| !t.is_remote));
        assert!(tracks[0].locator.ends_with("A.ogg"));
    }

    #[test]
    fn scan_keeps_raw_title_and_puts_composed_text_in_label() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, b"not real").unwrap();

        let settings = LibrarySettings {
            display_fields: vec![TrackDisplayField::Title, TrackDisplayField::Path],
            display_separator: " | ".to_string(),
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks[0].title, "song");
        let expected = format!("song | {}", path.display());
        assert_eq!(tracks[0].label.as_deref(), Some(expected.as_str()));
        assert_eq!(tracks[0].display(), expected);
    }

    #[test]
    fn scan_ids_are_stable_across_rescans() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"not real").unwrap();

        let settings = LibrarySettings::default();
        let first = scan(dir.path(), &settings);
        let second = scan(dir.path(), &settings);
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].id, TrackId::for_path(&dir.path().join("one.mp3")));
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "visible");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "root");
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, so max_depth=2 stops above d1/d2/*.
        let settings = LibrarySettings {
            max_depth: Some(2),
            display_fields: vec![TrackDisplayField::Filename],
            ..LibrarySettings::default()
        };
        let names: Vec<String> = scan(dir.path(), &settings)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert!(names.contains(&"root".to_string()));
        assert!(names.contains(&"one".to_string()));
        assert!(!names.contains(&"two".to_string()));
    }
}
