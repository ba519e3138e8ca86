//! Track descriptors and the typed constructor used to admit candidates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidTrackError;

/// Unique identifier of a track within the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Build an id, rejecting empty or whitespace-only strings.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// A fresh random id for imported tracks.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A staged copy of an imported file, owned by exactly one track.
///
/// Clones share the same underlying file. `release` removes it; playback of a
/// released handle fails like any other missing file.
#[derive(Clone)]
pub struct BlobHandle {
    path: PathBuf,
    released: Arc<AtomicBool>,
}

impl BlobHandle {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Delete the staged file. Calling this more than once is harmless.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "released blob"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to release blob")
            }
        }
    }
}

impl fmt::Debug for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobHandle")
            .field("path", &self.path)
            .field("released", &self.is_released())
            .finish()
    }
}

impl PartialEq for BlobHandle {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

/// Where the audio for a track comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocator {
    File(PathBuf),
    Blob(BlobHandle),
    Remote(String),
}

impl SourceLocator {
    /// Build a locator from a preview url or file path string.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s.to_string())
        } else {
            Self::File(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }

    /// The blob this locator owns, if any.
    pub fn blob(&self) -> Option<&BlobHandle> {
        match self {
            Self::Blob(h) => Some(h),
            _ => None,
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Blob(h) => write!(f, "blob:{}", h.path().display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Seconds; `0.0` while unknown.
    pub duration: f64,
    pub image_url: Option<String>,
    pub source: SourceLocator,
    pub date_added: DateTime<Utc>,
}

impl Track {
    /// Release any transient resource owned by this track.
    pub fn release(&self) {
        if let Some(blob) = self.source.blob() {
            blob.release();
        }
    }
}

/// An unchecked track candidate, as produced by imports, the console or
/// persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackDraft {
    pub id: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<f64>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
    pub file_path: Option<String>,
    pub date_added: Option<DateTime<Utc>>,
    /// `file_path` points at a staged copy owned by this track.
    #[serde(skip_serializing_if = "is_false")]
    pub staged: bool,
    #[serde(skip)]
    pub blob: Option<BlobHandle>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TryFrom<TrackDraft> for Track {
    type Error = InvalidTrackError;

    fn try_from(draft: TrackDraft) -> Result<Self, Self::Error> {
        let id = draft
            .id
            .and_then(TrackId::new)
            .ok_or(InvalidTrackError::MissingId)?;

        let title = draft
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| InvalidTrackError::MissingTitle {
                id: id.to_string(),
            })?;

        let source = if let Some(blob) = draft.blob {
            SourceLocator::Blob(blob)
        } else if let Some(path) = draft.file_path.as_deref().filter(|_| draft.staged) {
            SourceLocator::Blob(BlobHandle::new(PathBuf::from(path)))
        } else {
            draft
                .preview_url
                .as_deref()
                .or(draft.file_path.as_deref())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(SourceLocator::parse)
                .ok_or_else(|| InvalidTrackError::MissingLocator {
                    id: id.to_string(),
                })?
        };

        let non_empty = |s: Option<String>| {
            s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        Ok(Track {
            id,
            title,
            artist: non_empty(draft.artist),
            album: non_empty(draft.album),
            duration: draft
                .duration
                .filter(|d| d.is_finite() && *d > 0.0)
                .unwrap_or(0.0),
            image_url: non_empty(draft.image_url),
            source,
            date_added: draft.date_added.unwrap_or_else(Utc::now),
        })
    }
}

impl From<&Track> for TrackDraft {
    fn from(track: &Track) -> Self {
        let (preview_url, file_path, blob) = match &track.source {
            SourceLocator::Remote(url) => (Some(url.clone()), None, None),
            SourceLocator::File(p) => (None, Some(p.display().to_string()), None),
            SourceLocator::Blob(h) => (None, Some(h.path().display().to_string()), Some(h.clone())),
        };
        Self {
            id: Some(track.id.to_string()),
            title: Some(track.title.clone()),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration: Some(track.duration),
            image_url: track.image_url.clone(),
            preview_url,
            file_path,
            date_added: Some(track.date_added),
            staged: blob.is_some(),
            blob,
        }
    }
}
