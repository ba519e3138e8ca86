use crate::config::TrackDisplayField;

use super::model::Track;

/// Format seconds as `m:ss`, or `--:--` while unknown.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs <= 0.0 {
        return "--:--".to_string();
    }
    let total = secs.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Build a one-line listing for a track according to the provided `fields` and separator.
///
/// Falls back to the title when no parts were produced.
pub fn display_line(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    for f in fields {
        match f {
            TrackDisplayField::Title => parts.push(track.title.clone()),
            TrackDisplayField::Artist => {
                if let Some(a) = track.artist.as_deref().filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Album => {
                if let Some(a) = track.album.as_deref().filter(|s| !s.is_empty()) {
                    parts.push(a.to_string());
                }
            }
            TrackDisplayField::Duration => parts.push(format_time(track.duration)),
            TrackDisplayField::Source => parts.push(track.source.to_string()),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
