//! The player state tuple every transition produces.

use crate::library::{Catalog, Track, TrackId};
use crate::playlists::Playlists;

/// Everything the reducer owns.
///
/// `current_index` and `current_track` always agree: when an index is set,
/// `current_track` is a copy of `queue[index]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub catalog: Catalog,
    pub playlists: Playlists,
    pub(super) queue: Vec<Track>,
    pub(super) current_index: Option<usize>,
    pub(super) current_track: Option<Track>,
    pub is_playing: bool,
    pub volume: f32,
    pub current_time: f64,
    pub duration: f64,
    pub repeat: bool,
    pub shuffle: bool,
    /// Ids not yet visited in the current shuffle cycle.
    pub(super) shuffle_remaining: Vec<TrackId>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            playlists: Playlists::default(),
            queue: Vec::new(),
            current_index: None,
            current_track: None,
            is_playing: false,
            volume: 1.0,
            current_time: 0.0,
            duration: 0.0,
            repeat: false,
            shuffle: false,
            shuffle_remaining: Vec::new(),
        }
    }
}

impl PlayerState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn current_id(&self) -> Option<&TrackId> {
        self.current_track.as_ref().map(|t| &t.id)
    }

    pub fn queue_position(&self, id: &TrackId) -> Option<usize> {
        self.queue.iter().position(|t| &t.id == id)
    }

    /// Replace the queue without starting playback and select `current`
    /// (when queued) at `time` seconds. Used when restoring a session.
    pub fn with_queue(mut self, queue: Vec<Track>, current: Option<&TrackId>, time: f64) -> Self {
        self.queue = queue;
        self.clear_selection();
        if let Some(idx) = current.and_then(|id| self.queue_position(id)) {
            self.select(idx);
            self.current_time = if self.duration > 0.0 {
                time.clamp(0.0, self.duration)
            } else {
                time.max(0.0)
            };
        }
        self.is_playing = false;
        self
    }

    /// Point the cursor at `idx` and reset the transport position.
    pub(super) fn select(&mut self, idx: usize) {
        let track = self.queue[idx].clone();
        self.duration = track.duration;
        self.current_time = 0.0;
        self.current_index = Some(idx);
        self.current_track = Some(track);
    }

    pub(super) fn clear_selection(&mut self) {
        self.current_index = None;
        self.current_track = None;
        self.current_time = 0.0;
        self.duration = 0.0;
    }
}
