//! State transitions: one function per `Action` variant.
//!
//! Each transition takes the previous state by value and returns the next
//! one. Randomness (shuffle) comes from the reducer's own rng so transitions
//! are reproducible under a fixed seed.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{PlaybackSettings, ShufflePolicy};
use crate::library::{Track, TrackDraft, TrackId};
use crate::playlists::PlaylistId;

use super::action::Action;
use super::shuffle;
use super::state::PlayerState;

/// Knobs that shape the transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackRules {
    pub shuffle_policy: ShufflePolicy,
    pub restart_threshold_secs: f64,
    pub recent_limit: usize,
}

impl Default for PlaybackRules {
    fn default() -> Self {
        Self::from(&PlaybackSettings::default())
    }
}

impl From<&PlaybackSettings> for PlaybackRules {
    fn from(s: &PlaybackSettings) -> Self {
        Self {
            shuffle_policy: s.shuffle_policy,
            restart_threshold_secs: s.restart_threshold_secs,
            recent_limit: s.recent_limit,
        }
    }
}

pub struct Reducer {
    rules: PlaybackRules,
    rng: StdRng,
    /// Drafts the last `SetQueue` dropped as invalid.
    rejected: usize,
}

impl Reducer {
    pub fn new(rules: PlaybackRules) -> Self {
        Self {
            rules,
            rng: StdRng::from_entropy(),
            rejected: 0,
        }
    }

    /// Deterministic shuffle, for tests and reproducible sessions.
    pub fn seeded(rules: PlaybackRules, seed: u64) -> Self {
        Self {
            rules,
            rng: StdRng::seed_from_u64(seed),
            rejected: 0,
        }
    }

    /// How many drafts the most recent `SetQueue` could not turn into tracks.
    pub(super) fn last_rejected(&self) -> usize {
        self.rejected
    }

    pub fn reduce(&mut self, state: PlayerState, action: Action) -> PlayerState {
        tracing::trace!(action = action.name(), "dispatch");
        match action {
            Action::PlayTrack(track) => self.play_track(state, track),
            Action::TogglePlayback => toggle_playback(state),
            Action::SetVolume(v) => set_volume(state, v),
            Action::SetCurrentTime(t) => set_current_time(state, t),
            Action::SetDuration(d) => set_duration(state, d),
            Action::NextTrack => self.next_track(state),
            Action::PrevTrack => self.prev_track(state),
            Action::SetQueue { tracks, autoplay } => self.set_queue(state, tracks, autoplay),
            Action::ToggleFavorite(id) => toggle_favorite(state, id),
            Action::ToggleRepeat => toggle_repeat(state),
            Action::ToggleShuffle => toggle_shuffle(state),
            Action::DeleteTrack(id) => delete_track(state, id),
            Action::AddToCatalog(tracks) => add_to_catalog(state, tracks),
            Action::CreatePlaylist { id, name } => create_playlist(state, id, name),
            Action::DeletePlaylist(id) => delete_playlist(state, id),
            Action::AddToPlaylist { playlist, track } => add_to_playlist(state, playlist, track),
            Action::RemoveFromPlaylist { playlist, track } => {
                remove_from_playlist(state, playlist, track)
            }
        }
    }

    /// Start playing whatever `select` just pointed at.
    fn start_current(&self, s: &mut PlayerState) {
        s.is_playing = true;
        if let Some(id) = s.current_id().cloned() {
            s.shuffle_remaining.retain(|r| r != &id);
            s.playlists.push_recent(id, self.rules.recent_limit);
        }
    }

    fn play_track(&self, mut s: PlayerState, track: Track) -> PlayerState {
        s.catalog.insert_new(track.clone());
        let idx = match s.queue_position(&track.id) {
            Some(i) => i,
            None => {
                s.queue.push(track);
                s.queue.len() - 1
            }
        };
        s.select(idx);
        self.start_current(&mut s);
        s
    }

    fn next_track(&mut self, mut s: PlayerState) -> PlayerState {
        if s.queue.is_empty() {
            return s;
        }

        let idx = if s.shuffle {
            shuffle::pick_next(&mut s, self.rules.shuffle_policy, &mut self.rng)
        } else {
            s.current_index.map_or(0, |i| (i + 1) % s.queue.len())
        };
        s.select(idx);
        self.start_current(&mut s);
        s
    }

    fn prev_track(&self, mut s: PlayerState) -> PlayerState {
        if s.current_track.is_some() && s.current_time > self.rules.restart_threshold_secs {
            s.current_time = 0.0;
            return s;
        }
        if s.queue.is_empty() {
            return s;
        }

        if s.shuffle && s.playlists.recently_played.len() >= 2 {
            let target = s.playlists.recently_played[1].clone();
            if let Some(idx) = s.queue_position(&target) {
                // Step back through history: drop the entry for the track we leave.
                if s.current_id() == s.playlists.recently_played.first() {
                    s.playlists.recently_played.remove(0);
                }
                s.select(idx);
                self.start_current(&mut s);
                return s;
            }
        }

        let len = s.queue.len();
        let idx = s.current_index.map_or(len - 1, |i| (i + len - 1) % len);
        s.select(idx);
        self.start_current(&mut s);
        s
    }

    fn set_queue(&mut self, mut s: PlayerState, drafts: Vec<TrackDraft>, autoplay: bool) -> PlayerState {
        self.rejected = 0;
        let mut valid: Vec<Track> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            match Track::try_from(draft) {
                Ok(t) if valid.iter().any(|v| v.id == t.id) => {
                    tracing::debug!(id = %t.id, "duplicate track in queue input")
                }
                Ok(t) => valid.push(t),
                Err(e) => {
                    self.rejected += 1;
                    tracing::warn!(error = %e, "dropping invalid track");
                }
            }
        }

        if valid.is_empty() {
            tracing::warn!("set_queue: no valid tracks, keeping current queue");
            return s;
        }

        let mut introduced: Vec<TrackId> = Vec::new();
        let queue: Vec<Track> = valid
            .into_iter()
            .map(|t| match s.catalog.get(&t.id) {
                Some(known) => known.clone(),
                None => {
                    introduced.push(t.id.clone());
                    s.catalog.insert_new(t.clone());
                    t
                }
            })
            .collect();

        s.queue = queue;
        s.shuffle_remaining.clear();
        s.select(0);
        if autoplay {
            self.start_current(&mut s);
        } else {
            s.is_playing = false;
            if !introduced.is_empty() {
                s.playlists.bucket_imported(introduced);
            }
        }
        s
    }
}

fn toggle_playback(mut s: PlayerState) -> PlayerState {
    if s.current_track.is_some() {
        s.is_playing = !s.is_playing;
    }
    s
}

fn set_volume(mut s: PlayerState, v: f32) -> PlayerState {
    if !v.is_nan() {
        s.volume = v.clamp(0.0, 1.0);
    }
    s
}

fn set_current_time(mut s: PlayerState, t: f64) -> PlayerState {
    if !t.is_finite() {
        return s;
    }
    s.current_time = t.max(0.0);
    if s.duration > 0.0 && s.current_time >= s.duration {
        s.is_playing = s.repeat;
    }
    s
}

fn set_duration(mut s: PlayerState, d: f64) -> PlayerState {
    if !d.is_finite() || d < 0.0 {
        return s;
    }
    s.duration = d;

    let (Some(idx), Some(id)) = (s.current_index, s.current_id().cloned()) else {
        return s;
    };
    if d > 0.0 && s.queue[idx].duration <= 0.0 {
        s.catalog.correct_duration(&id, d);
        s.queue[idx].duration = d;
        if let Some(t) = s.current_track.as_mut() {
            t.duration = d;
        }
    }
    s
}

fn toggle_favorite(mut s: PlayerState, id: TrackId) -> PlayerState {
    s.playlists.toggle_favorite(id);
    s
}

fn toggle_repeat(mut s: PlayerState) -> PlayerState {
    s.repeat = !s.repeat;
    s
}

fn toggle_shuffle(mut s: PlayerState) -> PlayerState {
    s.shuffle = !s.shuffle;
    s.shuffle_remaining.clear();
    s
}

fn delete_track(mut s: PlayerState, id: TrackId) -> PlayerState {
    let from_catalog = s.catalog.remove(&id);
    s.playlists.forget(&id);
    s.shuffle_remaining.retain(|r| r != &id);

    let from_queue = s.queue_position(&id).map(|pos| (pos, s.queue.remove(pos)));

    if let Some((pos, _)) = &from_queue {
        match s.current_index {
            Some(cur) if cur == *pos => {
                if s.queue.is_empty() {
                    s.clear_selection();
                    s.is_playing = false;
                } else {
                    s.select(cur.min(s.queue.len() - 1));
                }
            }
            Some(cur) if cur > *pos => s.current_index = Some(cur - 1),
            _ => {}
        }
    }

    match (from_catalog, from_queue) {
        (Some(track), _) | (None, Some((_, track))) => {
            track.release();
            tracing::info!(id = %id, title = %track.title, "deleted track");
        }
        (None, None) => tracing::debug!(id = %id, "delete_track: unknown id"),
    }
    s
}

fn add_to_catalog(mut s: PlayerState, tracks: Vec<Track>) -> PlayerState {
    for track in tracks {
        if let Some(pos) = s.queue_position(&track.id) {
            s.queue[pos] = track.clone();
            if s.current_index == Some(pos) {
                s.current_track = Some(track.clone());
            }
        }
        s.catalog.upsert(track);
    }
    s
}

fn create_playlist(mut s: PlayerState, id: PlaylistId, name: String) -> PlayerState {
    let name = name.trim();
    let name = if name.is_empty() { "Untitled playlist" } else { name };
    s.playlists.create(id, name);
    s
}

fn delete_playlist(mut s: PlayerState, id: PlaylistId) -> PlayerState {
    if s.playlists.delete(&id).is_none() {
        tracing::debug!(playlist = %id, "delete_playlist: unknown playlist");
    }
    s
}

fn add_to_playlist(mut s: PlayerState, playlist: PlaylistId, track: TrackId) -> PlayerState {
    if !s.catalog.contains(&track) {
        tracing::debug!(playlist = %playlist, track = %track, "add_to_playlist: unknown track");
        return s;
    }
    s.playlists.add_to(&playlist, track);
    s
}

fn remove_from_playlist(mut s: PlayerState, playlist: PlaylistId, track: TrackId) -> PlayerState {
    s.playlists.remove_from(&playlist, &track);
    s
}
