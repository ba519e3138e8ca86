use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::create_sink_at;
use super::types::{LoadHandle, TransportEvent, TransportEventKind};

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the loaded source with the file at `path`, paused at zero.
    Load { handle: LoadHandle, path: PathBuf },
    Play,
    Pause,
    /// Drop the loaded source.
    Stop,
    /// Jump to an absolute position in seconds.
    Seek(f64),
    SetVolume(f32),
    Quit,
}

/// The currently loaded source and its elapsed-time bookkeeping.
struct Loaded {
    handle: LoadHandle,
    path: PathBuf,
    sink: Sink,
    paused: bool,
    ended: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn play(&mut self) {
        if !self.paused {
            return;
        }
        self.sink.play();
        self.paused = false;
        self.started_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.sink.pause();
        self.accumulated = self.elapsed();
        self.started_at = None;
        self.paused = true;
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<TransportEvent>,
    tick: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut s) => {
                // rodio logs to stderr when OutputStream is dropped; stdout/stderr
                // belong to the console.
                s.log_on_drop(false);
                Some(s)
            }
            Err(e) => {
                tracing::error!(error = %e, "no audio output device");
                None
            }
        };

        let mut loaded: Option<Loaded> = None;
        let mut volume: f32 = 1.0;

        let emit = |handle: LoadHandle, kind: TransportEventKind| {
            let _ = events.send(TransportEvent { handle, kind });
        };

        loop {
            match rx.recv_timeout(tick) {
                Ok(cmd) => match cmd {
                    AudioCmd::Load { handle, path } => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        let Some(stream) = stream.as_ref() else {
                            emit(handle, TransportEventKind::Error("no audio output device".into()));
                            continue;
                        };
                        match create_sink_at(stream, &path, Duration::ZERO, volume) {
                            Ok((sink, total)) => {
                                tracing::debug!(path = %path.display(), "loaded source");
                                if let Some(total) = total {
                                    emit(handle, TransportEventKind::DurationChange(total.as_secs_f64()));
                                }
                                loaded = Some(Loaded {
                                    handle,
                                    path,
                                    sink,
                                    paused: true,
                                    ended: false,
                                    started_at: None,
                                    accumulated: Duration::ZERO,
                                });
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to load source");
                                emit(handle, TransportEventKind::Error(e.to_string()));
                            }
                        }
                    }
                    AudioCmd::Play => {
                        if let Some(l) = loaded.as_mut() {
                            l.play();
                        }
                    }
                    AudioCmd::Pause => {
                        if let Some(l) = loaded.as_mut() {
                            l.pause();
                        }
                    }
                    AudioCmd::Stop => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                    }
                    AudioCmd::Seek(secs) => {
                        if let (Some(l), Some(stream)) = (loaded.as_mut(), stream.as_ref()) {
                            seek(l, stream, secs, volume, &emit);
                        }
                    }
                    AudioCmd::SetVolume(v) => {
                        volume = v.clamp(0.0, 1.0);
                        if let Some(l) = loaded.as_ref() {
                            l.sink.set_volume(volume);
                        }
                    }
                    AudioCmd::Quit => {
                        if let Some(old) = loaded.take() {
                            old.sink.stop();
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    let Some(l) = loaded.as_mut() else {
                        continue;
                    };
                    if l.paused || l.ended {
                        continue;
                    }
                    emit(l.handle, TransportEventKind::TimeUpdate(l.elapsed().as_secs_f64()));
                    if l.sink.empty() {
                        l.ended = true;
                        l.pause();
                        emit(l.handle, TransportEventKind::Ended);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Seek position for `secs`; negative values clamp to zero. `None` when the
/// value is not representable.
fn seek_target(secs: f64) -> Option<Duration> {
    if !secs.is_finite() {
        return None;
    }
    Duration::try_from_secs_f64(secs.max(0.0)).ok()
}

/// Rebuild the sink and skip into the file; the play/pause state is kept.
fn seek(
    l: &mut Loaded,
    stream: &OutputStream,
    secs: f64,
    volume: f32,
    emit: &impl Fn(LoadHandle, TransportEventKind),
) {
    let Some(target) = seek_target(secs) else {
        tracing::warn!(secs, "seek target out of range");
        emit(l.handle, TransportEventKind::Error(format!("cannot seek to {secs}s")));
        return;
    };
    match create_sink_at(stream, &l.path, target, volume) {
        Ok((sink, _)) => {
            l.sink.stop();
            l.sink = sink;
            l.accumulated = target;
            l.ended = false;
            if l.paused {
                l.started_at = None;
            } else {
                l.sink.play();
                l.started_at = Some(Instant::now());
            }
        }
        Err(e) => emit(l.handle, TransportEventKind::Error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_target_rejects_unrepresentable_positions() {
        assert_eq!(seek_target(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(seek_target(-3.0), Some(Duration::ZERO));
        assert_eq!(seek_target(1e30), None);
        assert_eq!(seek_target(f64::NAN), None);
        assert_eq!(seek_target(f64::INFINITY), None);
    }
}
