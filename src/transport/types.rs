//! Transport-facing types: the adapter trait and the events it reports.

use crate::error::TransportError;
use crate::library::SourceLocator;

/// Identifies one `load`; events from earlier loads are stale.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEventKind {
    /// Elapsed playback position in seconds.
    TimeUpdate(f64),
    /// Media duration in seconds, once decoded.
    DurationChange(f64),
    /// The source played to its end.
    Ended,
    /// The source could not be opened or decoded.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub handle: LoadHandle,
    pub kind: TransportEventKind,
}

/// A media sink the player core can drive.
///
/// Loading replaces whatever was loaded before; the previous sink is disposed.
/// A freshly loaded source is paused at position zero.
pub trait Transport {
    fn load(&mut self, source: &SourceLocator) -> Result<LoadHandle, TransportError>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Dispose of the loaded source.
    fn stop(&mut self);
    fn seek(&mut self, secs: f64);
    fn set_volume(&mut self, volume: f32);
}
