use std::path::Path;
use std::time::Duration;

use crate::config::TrackDisplayField;

/// Compose a display string for a scanned file from the configured `fields`.
///
/// Empty parts are skipped; when nothing survives the title is used as-is.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let non_blank = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);

    let parts: Vec<String> = fields
        .iter()
        .filter_map(|f| match f {
            TrackDisplayField::Title => non_blank(Some(title)),
            TrackDisplayField::Artist => non_blank(artist),
            TrackDisplayField::Album => non_blank(album),
            TrackDisplayField::Filename => non_blank(path.file_stem().and_then(|s| s.to_str())),
            TrackDisplayField::Path => Some(path.display().to_string()),
        })
        .collect();

    if parts.is_empty() {
        title.to_string()
    } else {
        parts.join(sep)
    }
}

/// `m:ss`, rounding partial seconds down.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
