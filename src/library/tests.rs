use std::path::Path;
use std::time::Duration;

use super::store::fuzzy_match_positions_lower;
use super::*;
use crate::config::TrackDisplayField;

fn t(id: &str, artist: &str, title: &str) -> Track {
    Track::local(id, Path::new("/music/x.mp3"), title, artist)
}

#[test]
fn display_from_fields_can_format_artist_title() {
    let p = Path::new("/tmp/Song.mp3");
    let fields = [TrackDisplayField::Artist, TrackDisplayField::Title];
    assert_eq!(
        display_from_fields(p, "Song", Some("Artist"), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", Some("  Artist  "), None, &fields, " - "),
        "Artist - Song"
    );
    assert_eq!(display_from_fields(p, "Song", None, None, &fields, " - "), "Song");
}

#[test]
fn display_from_fields_falls_back_to_title_when_nothing_matches() {
    let p = Path::new("/tmp/Song.mp3");
    assert_eq!(
        display_from_fields(p, "Song", None, None, &[TrackDisplayField::Album], "::"),
        "Song"
    );
    assert_eq!(
        display_from_fields(p, "Song", None, None, &[TrackDisplayField::Filename], "::"),
        "Song"
    );
}

#[test]
fn format_duration_is_minutes_and_padded_seconds() {
    assert_eq!(format_duration(Duration::ZERO), "0:00");
    assert_eq!(format_duration(Duration::from_millis(65_900)), "1:05");
    assert_eq!(format_duration(Duration::from_secs(3600)), "60:00");
}

#[test]
fn remote_constructor_detects_scheme() {
    let r = Track::remote("dz:1", "https://cdn.example/preview.mp3", "Song", "Band");
    assert!(r.is_remote);
    let odd = Track::remote("dz:2", "content://media/42", "Song", "Band");
    assert!(!odd.is_remote);
    assert_eq!(r.display(), "Band - Song");
    assert_eq!(t("a", "  ", "Solo").display(), "Solo");
}

#[test]
fn label_is_shown_as_is_without_repeating_the_artist() {
    let track = t("a", "Artist", "Title").with_label("Artist - Title");
    assert_eq!(track.title, "Title");
    assert_eq!(track.display(), "Artist - Title");
    assert_eq!(t("b", "Artist", "Title").with_label("  ").display(), "Artist - Title");
}

#[test]
fn store_add_replaces_by_id_and_keeps_order() {
    let mut store = TrackStore::new();
    assert!(store.add(t("a", "A", "One")));
    assert!(store.add(t("b", "B", "Two")));
    assert!(!store.add(t("a", "A", "One (remaster)")));

    let titles: Vec<&str> = store.list().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["One (remaster)", "Two"]);
    assert_eq!(store.len(), 2);
}

#[test]
fn store_remove_is_idempotent() {
    let mut store = TrackStore::from_tracks([t("a", "A", "One"), t("b", "B", "Two")]);
    let id = TrackId::from("a");

    assert!(store.contains(&id));
    assert_eq!(store.remove(&id).map(|t| t.title), Some("One".to_string()));
    assert!(store.remove(&id).is_none());
    assert!(!store.contains(&id));
    assert_eq!(store.len(), 1);
}

#[test]
fn search_is_fuzzy_over_artist_and_title() {
    let store = TrackStore::from_tracks([
        t("1", "Metallica", "Blackened"),
        t("2", "Black Sabbath", "Paranoid"),
    ]);

    let hits = store.search("mtbk");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, TrackId::from("1"));

    assert_eq!(store.search("PARANOID").len(), 1);
    assert_eq!(store.search("   ").len(), 2);
    assert!(store.search("xyz").is_empty());
}

#[test]
fn fuzzy_positions_are_in_order() {
    assert_eq!(fuzzy_match_positions_lower("hello world", "hw"), Some(vec![0, 6]));
    assert_eq!(fuzzy_match_positions_lower("hello", "oh"), None);
    assert_eq!(fuzzy_match_positions_lower("hello", ""), Some(vec![]));
}
