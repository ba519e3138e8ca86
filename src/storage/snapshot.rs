use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::library::{Catalog, Track, TrackDraft, TrackId};
use crate::player::PlayerState;
use crate::playlists::Playlists;

/// What survives a restart.
///
/// Fields are optional so a partial or older file still loads; missing
/// values fall back to configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub volume: Option<f32>,
    pub playlists: Playlists,
    pub repeat: Option<bool>,
    pub shuffle: Option<bool>,
    pub custom_tracks: Vec<TrackDraft>,
    pub current_track_id: Option<String>,
    pub current_time: f64,
}

/// Defaults applied when the file does not say otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreDefaults {
    pub volume: f32,
    pub repeat: bool,
    pub shuffle: bool,
}

impl PersistedState {
    /// Snapshot `state`. Tracks in `seeds` come from the library scan and are
    /// rediscovered on the next start, so only the rest is written out.
    pub fn capture(state: &PlayerState, seeds: &HashSet<TrackId>) -> Self {
        Self {
            volume: Some(state.volume),
            playlists: state.playlists.clone(),
            repeat: Some(state.repeat),
            shuffle: Some(state.shuffle),
            custom_tracks: state
                .catalog
                .tracks()
                .iter()
                .filter(|t| !seeds.contains(&t.id))
                .map(TrackDraft::from)
                .collect(),
            current_track_id: state.current_id().map(|id| id.to_string()),
            current_time: state.current_time,
        }
    }

    /// Rebuild the player state on top of freshly scanned `seeds`.
    ///
    /// The whole catalog becomes the queue, the saved track is selected and
    /// paused, and playlist entries pointing at unknown tracks are dropped.
    pub fn restore(self, seeds: Vec<Track>, defaults: RestoreDefaults) -> PlayerState {
        let mut catalog = Catalog::new(seeds);
        for draft in self.custom_tracks {
            match Track::try_from(draft) {
                Ok(track) => {
                    catalog.insert_new(track);
                }
                Err(e) => tracing::warn!(error = %e, "dropping persisted track"),
            }
        }

        let mut playlists = self.playlists;
        playlists.retain_known(|id| catalog.contains(id));

        let current = self.current_track_id.and_then(TrackId::new);
        let queue = catalog.tracks().to_vec();

        let mut state = PlayerState::new(catalog);
        state.playlists = playlists;
        state.volume = self
            .volume
            .filter(|v| !v.is_nan())
            .map_or(defaults.volume, |v| v.clamp(0.0, 1.0));
        state.repeat = self.repeat.unwrap_or(defaults.repeat);
        state.shuffle = self.shuffle.unwrap_or(defaults.shuffle);
        state.with_queue(queue, current.as_ref(), self.current_time)
    }
}
