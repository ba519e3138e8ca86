//! The single owner of player state.
//!
//! `Store` wraps the reducer with imperative methods, persists the state
//! after relevant changes and reports user-facing problems through the
//! injected `Notifier`.

use std::collections::HashSet;

use crate::library::{Track, TrackDraft, TrackId};
use crate::notify::{NoticeLevel, Notifier};
use crate::playlists::PlaylistId;
use crate::storage::{PersistedState, StateFile};

use super::action::Action;
use super::reducer::Reducer;
use super::state::PlayerState;

pub struct Store {
    state: PlayerState,
    reducer: Reducer,
    notifier: Box<dyn Notifier>,
    persistence: Option<StateFile>,
    /// Catalog entries that come from the library scan.
    seeds: HashSet<TrackId>,
}

impl Store {
    pub fn new(state: PlayerState, reducer: Reducer, notifier: Box<dyn Notifier>) -> Self {
        Self {
            state,
            reducer,
            notifier,
            persistence: None,
            seeds: HashSet::new(),
        }
    }

    /// Save after every persisting action. `seeds` are not written out.
    pub fn with_persistence(mut self, file: StateFile, seeds: HashSet<TrackId>) -> Self {
        self.persistence = Some(file);
        self.seeds = seeds;
        self
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn notify(&self, level: NoticeLevel, message: &str) {
        self.notifier.notify(level, message);
    }

    /// Run `action` through the reducer.
    pub fn dispatch(&mut self, action: Action) {
        let persists = action.persists();
        let prev = std::mem::take(&mut self.state);
        self.state = self.reducer.reduce(prev, action);
        if persists {
            self.persist();
        }
    }

    /// Write the current state to disk now.
    pub fn flush(&self) {
        self.persist();
    }

    fn persist(&self) {
        let Some(file) = &self.persistence else {
            return;
        };
        let snapshot = PersistedState::capture(&self.state, &self.seeds);
        if let Err(e) = file.save(&snapshot) {
            tracing::error!(error = %e, "failed to save state");
            self.notify(NoticeLevel::Error, &format!("Could not save player state: {e}"));
        }
    }

    pub fn play_track(&mut self, track: Track) {
        self.dispatch(Action::PlayTrack(track));
    }

    /// Play the catalog entry with `id`.
    pub fn play_id(&mut self, id: &TrackId) -> bool {
        match self.state.catalog.get(id).cloned() {
            Some(track) => {
                self.play_track(track);
                true
            }
            None => false,
        }
    }

    pub fn toggle_playback(&mut self) {
        self.dispatch(Action::TogglePlayback);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.dispatch(Action::SetVolume(volume));
    }

    pub fn set_current_time(&mut self, secs: f64) {
        self.dispatch(Action::SetCurrentTime(secs));
    }

    pub fn set_duration(&mut self, secs: f64) {
        self.dispatch(Action::SetDuration(secs));
    }

    pub fn next_track(&mut self) {
        self.dispatch(Action::NextTrack);
    }

    pub fn prev_track(&mut self) {
        self.dispatch(Action::PrevTrack);
    }

    /// Replace the queue. Returns false when nothing in `tracks` was playable.
    pub fn set_queue(&mut self, tracks: Vec<TrackDraft>, autoplay: bool) -> bool {
        let total = tracks.len();
        self.dispatch(Action::SetQueue { tracks, autoplay });
        let invalid = self.reducer.last_rejected();

        if invalid == total {
            self.notify(NoticeLevel::Warning, "Nothing playable to queue");
            return false;
        }
        if invalid > 0 {
            self.notify(
                NoticeLevel::Warning,
                &format!("Skipped {invalid} of {total} tracks without an id, title or source"),
            );
        }
        true
    }

    /// Queue the whole catalog in listing order.
    pub fn enqueue_catalog(&mut self, autoplay: bool) -> bool {
        let drafts = self
            .state
            .catalog
            .tracks()
            .iter()
            .map(TrackDraft::from)
            .collect();
        self.set_queue(drafts, autoplay)
    }

    /// Validate `drafts` and add them to the catalog. Returns the ids added.
    pub fn import(&mut self, drafts: Vec<TrackDraft>) -> Vec<TrackId> {
        let mut tracks = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match Track::try_from(draft) {
                Ok(t) => tracks.push(t),
                Err(e) => self.notify(NoticeLevel::Warning, &format!("Import skipped: {e}")),
            }
        }
        let ids: Vec<TrackId> = tracks.iter().map(|t| t.id.clone()).collect();
        if !tracks.is_empty() {
            self.dispatch(Action::AddToCatalog(tracks));
        }
        ids
    }

    pub fn toggle_favorite(&mut self, id: TrackId) {
        self.dispatch(Action::ToggleFavorite(id));
    }

    pub fn toggle_repeat(&mut self) {
        self.dispatch(Action::ToggleRepeat);
    }

    pub fn toggle_shuffle(&mut self) {
        self.dispatch(Action::ToggleShuffle);
    }

    pub fn delete_track(&mut self, id: TrackId) {
        self.dispatch(Action::DeleteTrack(id));
    }

    pub fn create_playlist(&mut self, name: impl Into<String>) -> PlaylistId {
        let id = PlaylistId::generate();
        self.dispatch(Action::CreatePlaylist {
            id: id.clone(),
            name: name.into(),
        });
        id
    }

    pub fn delete_playlist(&mut self, id: PlaylistId) {
        self.dispatch(Action::DeletePlaylist(id));
    }

    pub fn add_to_playlist(&mut self, playlist: PlaylistId, track: TrackId) {
        self.dispatch(Action::AddToPlaylist { playlist, track });
    }

    pub fn remove_from_playlist(&mut self, playlist: PlaylistId, track: TrackId) {
        self.dispatch(Action::RemoveFromPlaylist { playlist, track });
    }
}
