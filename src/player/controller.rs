//! Keeps a `Transport` in step with the store.
//!
//! Every intent goes through [`PlaybackController::apply`], which diffs the
//! state before and after and issues the matching transport calls. Transport
//! events flow back through [`PlaybackController::handle_event`].

use std::time::{Duration, Instant};

use crate::library::{SourceLocator, TrackId};
use crate::notify::NoticeLevel;
use crate::transport::{LoadHandle, Transport, TransportEvent, TransportEventKind};

use super::store::Store;

/// Position moves backwards by more than this only when the core asked for it.
const SEEK_EPSILON_SECS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
struct Synced {
    track: TrackId,
    source: SourceLocator,
    handle: LoadHandle,
}

pub struct PlaybackController<T: Transport> {
    store: Store,
    transport: T,
    loaded: Option<Synced>,
    playing: bool,
    volume: Option<f32>,
    pending_skip: Option<(Instant, LoadHandle)>,
    error_skip_delay: Duration,
}

impl<T: Transport> PlaybackController<T> {
    /// Wrap `store` and bring `transport` in line with its current state.
    pub fn new(store: Store, transport: T, error_skip_delay: Duration) -> Self {
        let mut controller = Self {
            store,
            transport,
            loaded: None,
            playing: false,
            volume: None,
            pending_skip: None,
            error_skip_delay,
        };
        controller.sync(f64::INFINITY);
        controller
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Run an intent against the store, then sync the transport.
    pub fn apply<R>(&mut self, f: impl FnOnce(&mut Store) -> R) -> R {
        let before = self.store.state().current_time;
        let out = f(&mut self.store);
        self.sync(before);
        out
    }

    /// Jump to `secs` in the current track.
    pub fn seek(&mut self, secs: f64) {
        if self.store.state().current_track().is_none() {
            return;
        }
        let duration = self.store.state().duration;
        let secs = if duration > 0.0 { secs.min(duration) } else { secs };
        self.store.set_current_time(secs);
        self.transport.seek(self.store.state().current_time);
    }

    fn sync(&mut self, time_before: f64) {
        let state = self.store.state();

        let Some(track) = state.current_track() else {
            if self.loaded.take().is_some() {
                self.transport.stop();
            }
            self.playing = false;
            self.pending_skip = None;
            self.sync_volume();
            return;
        };

        let same_source = self
            .loaded
            .as_ref()
            .is_some_and(|l| l.track == track.id && l.source == track.source);

        if !same_source {
            let (id, source, title) = (track.id.clone(), track.source.clone(), track.title.clone());
            let resume_at = state.current_time;
            self.pending_skip = None;
            self.playing = false;
            match self.transport.load(&source) {
                Ok(handle) => {
                    tracing::debug!(track = %id, handle = handle.0, "loaded track");
                    self.loaded = Some(Synced {
                        track: id,
                        source,
                        handle,
                    });
                    if resume_at > 0.0 {
                        self.transport.seek(resume_at);
                    }
                }
                Err(e) => {
                    self.loaded = None;
                    self.store.notify(
                        NoticeLevel::Warning,
                        &format!("Can't play \"{title}\": {e}"),
                    );
                    self.schedule_skip(LoadHandle(0));
                    self.sync_volume();
                    return;
                }
            }
        } else if state.current_time + SEEK_EPSILON_SECS < time_before {
            self.transport.seek(state.current_time);
        }

        let want_playing = self.store.state().is_playing;
        if want_playing != self.playing {
            if want_playing {
                self.transport.play();
            } else {
                self.transport.pause();
            }
            self.playing = want_playing;
        }
        self.sync_volume();
    }

    fn sync_volume(&mut self) {
        let volume = self.store.state().volume;
        if self.volume != Some(volume) {
            self.transport.set_volume(volume);
            self.volume = Some(volume);
        }
    }

    fn schedule_skip(&mut self, handle: LoadHandle) {
        self.pending_skip = Some((Instant::now() + self.error_skip_delay, handle));
    }

    fn current_handle(&self) -> Option<LoadHandle> {
        self.loaded.as_ref().map(|l| l.handle)
    }

    /// React to an event from the transport. Events from a previous load are ignored.
    pub fn handle_event(&mut self, event: TransportEvent) {
        if self.current_handle() != Some(event.handle) {
            tracing::trace!(handle = event.handle.0, "stale transport event");
            return;
        }

        match event.kind {
            TransportEventKind::TimeUpdate(t) => self.apply(|s| s.set_current_time(t)),
            TransportEventKind::DurationChange(d) => self.apply(|s| s.set_duration(d)),
            TransportEventKind::Ended => {
                if self.store.state().repeat {
                    self.store.set_current_time(0.0);
                    self.transport.seek(0.0);
                    self.transport.play();
                    self.playing = true;
                } else {
                    // The transport paused itself; a same-source advance has
                    // to rewind and resume explicitly.
                    self.playing = false;
                    self.store.next_track();
                    self.sync(f64::INFINITY);
                }
            }
            TransportEventKind::Error(reason) => {
                let title = self
                    .store
                    .state()
                    .current_track()
                    .map(|t| t.title.clone())
                    .unwrap_or_default();
                tracing::warn!(reason = %reason, title = %title, "playback error");
                self.store.notify(
                    NoticeLevel::Warning,
                    &format!("Can't play \"{title}\": {reason}; skipping"),
                );
                self.schedule_skip(event.handle);
            }
        }
    }

    /// Fire a scheduled skip once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some((due, handle)) = self.pending_skip else {
            return;
        };
        if now < due {
            return;
        }
        self.pending_skip = None;

        // A failed load leaves nothing loaded; otherwise the user may have
        // moved on since the error.
        let still_current = match self.current_handle() {
            Some(h) => h == handle,
            None => handle == LoadHandle(0),
        };
        if still_current {
            self.apply(|s| s.next_track());
        }
    }

    /// Whether an error skip is waiting to fire.
    pub fn skip_pending(&self) -> bool {
        self.pending_skip.is_some()
    }

    /// Persist the final state.
    pub fn flush(&self) {
        self.store.flush();
    }
}
