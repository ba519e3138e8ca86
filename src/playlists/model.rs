//! Favorites, recently played, and user playlists. Everything references
//! catalog entries by `TrackId`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::library::TrackId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(String);

impl PlaylistId {
    pub const IMPORTED: &'static str = "imported";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// The synthetic playlist collecting tracks queued without autoplay.
    pub fn imported() -> Self {
        Self(Self::IMPORTED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub name: String,
    pub tracks: Vec<TrackId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append `id` unless already present. Returns whether it was added.
    pub fn add(&mut self, id: TrackId) -> bool {
        if self.tracks.contains(&id) {
            return false;
        }
        self.tracks.push(id);
        true
    }

    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| t != id);
        self.tracks.len() != before
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Playlists {
    pub favorites: Vec<TrackId>,
    /// Most recent first, no duplicates.
    pub recently_played: Vec<TrackId>,
    pub custom: BTreeMap<PlaylistId, Playlist>,
}

impl Playlists {
    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Add `id` to favorites, or remove it when already there.
    pub fn toggle_favorite(&mut self, id: TrackId) -> bool {
        if let Some(pos) = self.favorites.iter().position(|f| f == &id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(id);
            true
        }
    }

    /// Move `id` to the front of the recently played list.
    pub fn push_recent(&mut self, id: TrackId, limit: usize) {
        self.recently_played.retain(|r| r != &id);
        self.recently_played.insert(0, id);
        self.recently_played.truncate(limit.max(1));
    }

    /// Drop every reference to `id`.
    pub fn forget(&mut self, id: &TrackId) {
        self.favorites.retain(|f| f != id);
        self.recently_played.retain(|r| r != id);
        for playlist in self.custom.values_mut() {
            playlist.remove(id);
        }
    }

    /// Drop references to tracks `known` does not accept.
    pub fn retain_known(&mut self, known: impl Fn(&TrackId) -> bool) {
        self.favorites.retain(|f| known(f));
        self.recently_played.retain(|r| known(r));
        for playlist in self.custom.values_mut() {
            playlist.tracks.retain(|t| known(t));
        }
    }

    pub fn create(&mut self, id: PlaylistId, name: impl Into<String>) {
        self.custom.entry(id).or_insert_with(|| Playlist::new(name));
    }

    pub fn delete(&mut self, id: &PlaylistId) -> Option<Playlist> {
        self.custom.remove(id)
    }

    pub fn get(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.custom.get(id)
    }

    pub fn add_to(&mut self, playlist: &PlaylistId, track: TrackId) -> bool {
        self.custom
            .get_mut(playlist)
            .map(|p| p.add(track))
            .unwrap_or(false)
    }

    pub fn remove_from(&mut self, playlist: &PlaylistId, track: &TrackId) -> bool {
        self.custom
            .get_mut(playlist)
            .map(|p| p.remove(track))
            .unwrap_or(false)
    }

    /// Add `ids` to the synthetic "Imported" playlist, creating it on demand.
    pub fn bucket_imported(&mut self, ids: impl IntoIterator<Item = TrackId>) {
        let playlist = self
            .custom
            .entry(PlaylistId::imported())
            .or_insert_with(|| Playlist::new("Imported"));
        for id in ids {
            playlist.add(id);
        }
    }
}
