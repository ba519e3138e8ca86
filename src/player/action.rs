use crate::library::{Track, TrackDraft, TrackId};
use crate::playlists::PlaylistId;

/// Every intent the player state machine understands.
#[derive(Debug, Clone)]
pub enum Action {
    /// Select `track` (queueing it when absent) and start playing.
    PlayTrack(Track),
    /// Flip between playing and paused.
    TogglePlayback,
    /// Set the output volume; clamped to `[0, 1]`.
    SetVolume(f32),
    /// Transport position in seconds.
    SetCurrentTime(f64),
    /// Media duration in seconds, once known.
    SetDuration(f64),
    NextTrack,
    PrevTrack,
    /// Replace the queue with the valid subset of `tracks`.
    SetQueue {
        tracks: Vec<TrackDraft>,
        autoplay: bool,
    },
    ToggleFavorite(TrackId),
    ToggleRepeat,
    ToggleShuffle,
    /// Remove a track from the catalog, the queue and every playlist.
    DeleteTrack(TrackId),
    /// Add or refresh catalog entries.
    AddToCatalog(Vec<Track>),
    CreatePlaylist {
        id: PlaylistId,
        name: String,
    },
    DeletePlaylist(PlaylistId),
    AddToPlaylist {
        playlist: PlaylistId,
        track: TrackId,
    },
    RemoveFromPlaylist {
        playlist: PlaylistId,
        track: TrackId,
    },
}

impl Action {
    /// Whether the state after this action should be written to disk right
    /// away. Position and duration ticks are flushed on shutdown instead.
    pub fn persists(&self) -> bool {
        !matches!(self, Action::SetCurrentTime(_) | Action::SetDuration(_))
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::PlayTrack(_) => "play_track",
            Action::TogglePlayback => "toggle_playback",
            Action::SetVolume(_) => "set_volume",
            Action::SetCurrentTime(_) => "set_current_time",
            Action::SetDuration(_) => "set_duration",
            Action::NextTrack => "next_track",
            Action::PrevTrack => "prev_track",
            Action::SetQueue { .. } => "set_queue",
            Action::ToggleFavorite(_) => "toggle_favorite",
            Action::ToggleRepeat => "toggle_repeat",
            Action::ToggleShuffle => "toggle_shuffle",
            Action::DeleteTrack(_) => "delete_track",
            Action::AddToCatalog(_) => "add_to_catalog",
            Action::CreatePlaylist { .. } => "create_playlist",
            Action::DeletePlaylist(_) => "delete_playlist",
            Action::AddToPlaylist { .. } => "add_to_playlist",
            Action::RemoveFromPlaylist { .. } => "remove_from_playlist",
        }
    }
}
