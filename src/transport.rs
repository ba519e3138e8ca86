//! Transport adapter: the boundary between the player core and actual audio
//! output.
//!
//! `RodioTransport` decodes local files on a dedicated thread and reports
//! elapsed time, duration, end of media and failures as `TransportEvent`s.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioTransport;
pub use types::*;
