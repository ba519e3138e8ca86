//! The in-memory catalog: every track the player knows about, in insertion order.

use super::model::{Track, TrackId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        let mut catalog = Self::default();
        for t in tracks {
            catalog.upsert(t);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.get(id).is_some()
    }

    /// Track at a listing position (as shown by the console).
    pub fn nth(&self, i: usize) -> Option<&Track> {
        self.tracks.get(i)
    }

    /// Insert `track`, replacing an existing entry with the same id in place.
    ///
    /// A replaced entry's blob is released unless the new track reuses it.
    pub fn upsert(&mut self, track: Track) {
        match self.tracks.iter_mut().find(|t| t.id == track.id) {
            Some(existing) => {
                if existing.source != track.source {
                    existing.release();
                }
                *existing = track;
            }
            None => self.tracks.push(track),
        }
    }

    /// Insert `track` only if its id is unseen. Returns whether it was added.
    pub fn insert_new(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    pub fn remove(&mut self, id: &TrackId) -> Option<Track> {
        let pos = self.tracks.iter().position(|t| &t.id == id)?;
        Some(self.tracks.remove(pos))
    }

    /// Record a duration reported by the transport for a track whose
    /// duration was unknown.
    pub fn correct_duration(&mut self, id: &TrackId, duration: f64) -> bool {
        match self.tracks.iter_mut().find(|t| &t.id == id) {
            Some(t) if t.duration <= 0.0 => {
                t.duration = duration;
                true
            }
            _ => false,
        }
    }
}
