use std::path::{Path, PathBuf};

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::ImportError;

use super::blob::BlobStore;
use super::model::{Track, TrackDraft, TrackId};

pub(super) fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
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

/// Stable id for a file on disk so playlists survive restarts.
pub fn track_id_for_path(path: &Path) -> TrackId {
    let key = path.display().to_string();
    let id = uuid::Uuid::new_v5(&uuid::Uuid::NAMESPACE_URL, key.as_bytes());
    TrackId::new(id.to_string()).unwrap_or_else(TrackId::generate)
}

/// Build a draft from the file name and whatever tags lofty can read.
pub fn read_draft(path: &Path) -> TrackDraft {
    let mut draft = TrackDraft {
        id: Some(track_id_for_path(path).to_string()),
        title: path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .or_else(|| Some("UNKNOWN".to_string())),
        file_path: Some(path.display().to_string()),
        ..TrackDraft::default()
    };

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            draft.duration = Some(tagged.properties().duration().as_secs_f64());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    draft.title = Some(v.to_string());
                }
                draft.artist = tag.artist().map(|v| v.trim().to_string());
                draft.album = tag.album().map(|v| v.trim().to_string());
            }
        }
        Err(e) => tracing::debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    draft
}

pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

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

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if path.is_file()
            && (settings.include_hidden || !is_hidden(path))
            && is_audio_file(path, settings)
        {
            match Track::try_from(read_draft(path)) {
                Ok(track) => tracks.push(track),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping file"),
            }
        }
    }

    tracks.sort_by(|a, b| {
        let key = |t: &Track| {
            format!("{} {}", t.artist.as_deref().unwrap_or(""), t.title).to_lowercase()
        };
        key(a).cmp(&key(b))
    });
    tracing::info!(dir = %dir.display(), count = tracks.len(), "library scan finished");
    tracks
}

/// Turn an explicitly chosen file into a draft, staging a copy when a blob
/// store is given. Staged copies get a fresh id.
pub fn import_path(
    path: &Path,
    settings: &LibrarySettings,
    blobs: Option<&BlobStore>,
) -> Result<TrackDraft, ImportError> {
    if !path.is_file() || !is_audio_file(path, settings) {
        return Err(ImportError::NotAudio(path.to_path_buf()));
    }

    let mut draft = read_draft(path);
    if let Some(store) = blobs {
        draft.blob = Some(store.stage(path)?);
        draft.id = Some(TrackId::generate().to_string());
        draft.file_path = None;
    }
    Ok(draft)
}

/// Import several files. Failures are logged and returned next to the drafts
/// that succeeded.
pub fn import_paths(
    paths: &[PathBuf],
    settings: &LibrarySettings,
    blobs: Option<&BlobStore>,
) -> (Vec<TrackDraft>, Vec<ImportError>) {
    let mut drafts = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();
    for path in paths {
        match import_path(path, settings, blobs) {
            Ok(d) => drafts.push(d),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "import failed");
                errors.push(e);
            }
        }
    }
    (drafts, errors)
}
