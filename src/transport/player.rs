use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::error::TransportError;
use crate::library::SourceLocator;

use super::thread::{AudioCmd, spawn_audio_thread};
use super::types::{LoadHandle, Transport, TransportEvent};

/// `Transport` backed by a rodio sink living on its own thread.
pub struct RodioTransport {
    tx: Sender<AudioCmd>,
    next_handle: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioTransport {
    /// Spawn the audio thread. Events are delivered on the returned receiver.
    pub fn new(settings: &AudioSettings) -> (Self, Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>();

        let join = spawn_audio_thread(rx, event_tx, Duration::from_millis(settings.tick_ms.max(1)));

        let transport = Self {
            tx,
            next_handle: 0,
            join: Mutex::new(Some(join)),
        };
        (transport, event_rx)
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            tracing::error!("audio thread is gone");
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(AudioCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// Path a locator can be decoded from, if any.
fn local_path(source: &SourceLocator) -> Result<PathBuf, TransportError> {
    match source {
        SourceLocator::File(p) => Ok(p.clone()),
        SourceLocator::Blob(h) if h.is_released() => {
            Err(TransportError::Open(h.path().display().to_string()))
        }
        SourceLocator::Blob(h) => Ok(h.path().to_path_buf()),
        SourceLocator::Remote(url) => Err(TransportError::Unsupported(url.clone())),
    }
}

impl Transport for RodioTransport {
    fn load(&mut self, source: &SourceLocator) -> Result<LoadHandle, TransportError> {
        let path = local_path(source)?;
        self.next_handle += 1;
        let handle = LoadHandle(self.next_handle);
        self.tx
            .send(AudioCmd::Load { handle, path })
            .map_err(|_| TransportError::Disconnected)?;
        Ok(handle)
    }

    fn play(&mut self) {
        self.send(AudioCmd::Play);
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn seek(&mut self, secs: f64) {
        self.send(AudioCmd::Seek(secs));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(AudioCmd::SetVolume(volume));
    }
}
