//! Executes parsed console commands against the playback controller and
//! prints listings.

use crate::config::Settings;
use crate::library::{BlobStore, Track, TrackId, display_line, format_time, import_paths};
use crate::notify::NoticeLevel;
use crate::player::{PlaybackController, PlayerState};
use crate::playlists::PlaylistId;
use crate::transport::Transport;

use super::command::{Command, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a> {
    settings: &'a Settings,
    blobs: Option<BlobStore>,
}

fn catalog_id(state: &PlayerState, n: usize) -> Result<TrackId, String> {
    state
        .catalog
        .nth(n - 1)
        .map(|t| t.id.clone())
        .ok_or_else(|| format!("no track {n} (catalog has {})", state.catalog.len()))
}

fn playlist_id(state: &PlayerState, n: usize) -> Result<PlaylistId, String> {
    state
        .playlists
        .custom
        .keys()
        .nth(n - 1)
        .cloned()
        .ok_or_else(|| format!("no playlist {n}"))
}

fn clock(secs: f64) -> String {
    if secs > 0.0 {
        format_time(secs)
    } else {
        "0:00".to_string()
    }
}

impl<'a> Console<'a> {
    pub fn new(settings: &'a Settings, blobs: Option<BlobStore>) -> Self {
        Self { settings, blobs }
    }

    fn line(&self, track: &Track) -> String {
        let lib = &self.settings.library;
        display_line(track, &lib.display_fields, &lib.display_separator)
    }

    fn print_ids<'s>(&self, state: &PlayerState, ids: impl IntoIterator<Item = &'s TrackId>) {
        let mut any = false;
        for id in ids {
            if let Some(t) = state.catalog.get(id) {
                println!("  {}", self.line(t));
                any = true;
            }
        }
        if !any {
            println!("  (empty)");
        }
    }

    /// Run one command. Lookup failures are reported through the store's notifier.
    pub fn execute<T: Transport>(&self, cmd: Command, player: &mut PlaybackController<T>) -> Flow {
        if let Err(msg) = self.try_execute(cmd.clone(), player) {
            player.store().notify(NoticeLevel::Warning, &msg);
        }
        if cmd == Command::Quit {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    fn try_execute<T: Transport>(
        &self,
        cmd: Command,
        player: &mut PlaybackController<T>,
    ) -> Result<(), String> {
        tracing::debug!(command = ?cmd, "console command");
        match cmd {
            Command::List => self.list(player.store().state()),
            Command::Queue => self.queue(player.store().state()),
            Command::Play(n) => {
                let id = catalog_id(player.store().state(), n)?;
                player.apply(|s| s.play_id(&id));
                self.status(player.store().state());
            }
            Command::Toggle => {
                if player.store().state().current_track().is_none() {
                    return Err("nothing loaded; try `play <n>` or `enqueue-all`".to_string());
                }
                player.apply(|s| s.toggle_playback());
                self.status(player.store().state());
            }
            Command::Next => {
                player.apply(|s| s.next_track());
                self.status(player.store().state());
            }
            Command::Prev => {
                player.apply(|s| s.prev_track());
                self.status(player.store().state());
            }
            Command::Seek(secs) => player.seek(secs),
            Command::Volume(v) => {
                player.apply(|s| s.set_volume(v));
                println!("volume {:.0}%", player.store().state().volume * 100.0);
            }
            Command::Repeat => {
                player.apply(|s| s.toggle_repeat());
                let on = player.store().state().repeat;
                println!("repeat {}", if on { "on" } else { "off" });
            }
            Command::Shuffle => {
                player.apply(|s| s.toggle_shuffle());
                let on = player.store().state().shuffle;
                println!("shuffle {}", if on { "on" } else { "off" });
            }
            Command::Favorite(n) => {
                let state = player.store().state();
                let id = match n {
                    Some(n) => catalog_id(state, n)?,
                    None => state.current_id().cloned().ok_or("nothing is playing")?,
                };
                player.apply(|s| s.toggle_favorite(id.clone()));
                let fav = player.store().state().playlists.is_favorite(&id);
                println!("{} favorites", if fav { "added to" } else { "removed from" });
            }
            Command::Favorites => {
                let state = player.store().state();
                println!("favorites:");
                self.print_ids(state, &state.playlists.favorites);
            }
            Command::Recent => {
                let state = player.store().state();
                println!("recently played:");
                self.print_ids(state, &state.playlists.recently_played);
            }
            Command::Playlists => self.playlists(player.store().state()),
            Command::NewPlaylist(name) => {
                let id = player.apply(|s| s.create_playlist(name));
                let state = player.store().state();
                let pos = state.playlists.custom.keys().position(|k| k == &id);
                if let (Some(pos), Some(pl)) = (pos, state.playlists.get(&id)) {
                    println!("created playlist {}: {}", pos + 1, pl.name);
                }
            }
            Command::AddToPlaylist { playlist, track } => {
                let state = player.store().state();
                let pl = playlist_id(state, playlist)?;
                let id = catalog_id(state, track)?;
                player.apply(|s| s.add_to_playlist(pl, id));
            }
            Command::RemoveFromPlaylist { playlist, track } => {
                let state = player.store().state();
                let pl = playlist_id(state, playlist)?;
                let id = catalog_id(state, track)?;
                player.apply(|s| s.remove_from_playlist(pl, id));
            }
            Command::DropPlaylist(n) => {
                let pl = playlist_id(player.store().state(), n)?;
                player.apply(|s| s.delete_playlist(pl));
            }
            Command::Delete(n) => {
                let state = player.store().state();
                let id = catalog_id(state, n)?;
                let title = state.catalog.get(&id).map(|t| t.title.clone()).unwrap_or_default();
                player.apply(|s| s.delete_track(id));
                println!("deleted {title}");
            }
            Command::Import(paths) => {
                let (drafts, errors) =
                    import_paths(&paths, &self.settings.library, self.blobs.as_ref());
                for e in &errors {
                    player.store().notify(NoticeLevel::Warning, &e.to_string());
                }
                let added = player.apply(|s| s.import(drafts));
                player.store().notify(
                    NoticeLevel::Info,
                    &format!("imported {} of {} files", added.len(), paths.len()),
                );
            }
            Command::EnqueueAll => {
                if player.apply(|s| s.enqueue_catalog(false)) {
                    println!("queued {} tracks", player.store().state().queue().len());
                }
            }
            Command::Status => self.status(player.store().state()),
            Command::Config => match self.settings.to_toml() {
                Ok(s) => println!("{s}"),
                Err(e) => return Err(format!("cannot render config: {e}")),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
        Ok(())
    }

    fn list(&self, state: &PlayerState) {
        if state.catalog.is_empty() {
            println!("catalog is empty; try `import <path>`");
            return;
        }
        let current = state.current_id();
        for (i, t) in state.catalog.tracks().iter().enumerate() {
            let mark = if current == Some(&t.id) { '>' } else { ' ' };
            let fav = if state.playlists.is_favorite(&t.id) { '*' } else { ' ' };
            println!("{mark}{fav}{:>4}  {}", i + 1, self.line(t));
        }
    }

    fn queue(&self, state: &PlayerState) {
        if state.queue().is_empty() {
            println!("queue is empty; try `enqueue-all`");
            return;
        }
        for (i, t) in state.queue().iter().enumerate() {
            let mark = if state.current_index() == Some(i) { '>' } else { ' ' };
            println!("{mark}{:>4}  {}", i + 1, self.line(t));
        }
    }

    fn playlists(&self, state: &PlayerState) {
        if state.playlists.custom.is_empty() {
            println!("no playlists; try `new <name>`");
            return;
        }
        for (i, pl) in state.playlists.custom.values().enumerate() {
            println!("{:>3}. {} ({} tracks)", i + 1, pl.name, pl.tracks.len());
            for id in &pl.tracks {
                if let Some(t) = state.catalog.get(id) {
                    println!("       {}", self.line(t));
                }
            }
        }
    }

    fn status(&self, state: &PlayerState) {
        let Some(track) = state.current_track() else {
            println!("stopped");
            return;
        };
        let mut flags = Vec::new();
        if state.repeat {
            flags.push("repeat");
        }
        if state.shuffle {
            flags.push("shuffle");
        }
        println!(
            "{} {}  [{} / {}]  vol {:.0}%{}",
            if state.is_playing { "playing" } else { "paused " },
            self.line(track),
            clock(state.current_time),
            format_time(state.duration),
            state.volume * 100.0,
            if flags.is_empty() {
                String::new()
            } else {
                format!("  ({})", flags.join(", "))
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::library::{SourceLocator, TrackDraft};
    use crate::notify::RecordingNotifier;
    use crate::player::{PlaybackRules, Reducer, Store};
    use crate::transport::LoadHandle;
    use std::time::Duration;

    struct NullTransport;

    impl Transport for NullTransport {
        fn load(&mut self, _: &SourceLocator) -> Result<LoadHandle, TransportError> {
            Ok(LoadHandle(1))
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn seek(&mut self, _: f64) {}
        fn set_volume(&mut self, _: f32) {}
    }

    fn player(notes: &RecordingNotifier) -> PlaybackController<NullTransport> {
        let mut store = Store::new(
            PlayerState::default(),
            Reducer::seeded(PlaybackRules::default(), 1),
            Box::new(notes.clone()),
        );
        let drafts = ["a", "b"]
            .iter()
            .map(|id| TrackDraft {
                id: Some(id.to_string()),
                title: Some(id.to_uppercase()),
                preview_url: Some(format!("/{id}.mp3")),
                ..TrackDraft::default()
            })
            .collect();
        store.import(drafts);
        PlaybackController::new(store, NullTransport, Duration::ZERO)
    }

    #[test]
    fn positions_map_to_catalog_entries() {
        let settings = Settings::default();
        let console = Console::new(&settings, None);
        let notes = RecordingNotifier::default();
        let mut p = player(&notes);

        assert_eq!(console.execute(Command::Play(2), &mut p), Flow::Continue);
        assert_eq!(p.store().state().current_id().map(|i| i.as_str()), Some("b"));

        console.execute(Command::Favorite(None), &mut p);
        assert_eq!(p.store().state().playlists.favorites.len(), 1);

        console.execute(Command::NewPlaylist("Mix".into()), &mut p);
        console.execute(Command::AddToPlaylist { playlist: 1, track: 1 }, &mut p);
        let pl = p.store().state().playlists.custom.values().next().unwrap();
        assert_eq!(pl.tracks.len(), 1);
        assert!(notes.notices().is_empty());
    }

    #[test]
    fn out_of_range_positions_are_reported() {
        let settings = Settings::default();
        let console = Console::new(&settings, None);
        let notes = RecordingNotifier::default();
        let mut p = player(&notes);

        console.execute(Command::Play(9), &mut p);
        console.execute(Command::DropPlaylist(1), &mut p);
        console.execute(Command::Toggle, &mut p);

        let notices = notes.notices();
        assert_eq!(notices.len(), 3);
        assert!(notices[0].1.contains("no track 9"));
        assert!(p.store().state().current_track().is_none());
    }

    #[test]
    fn quit_ends_the_loop() {
        let settings = Settings::default();
        let console = Console::new(&settings, None);
        let notes = RecordingNotifier::default();
        let mut p = player(&notes);
        assert_eq!(console.execute(Command::Quit, &mut p), Flow::Quit);
    }
}
