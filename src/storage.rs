//! Persistence of the player state as a JSON document.
//!
//! The file is read once at startup and rewritten after every state change
//! that should survive a restart.

mod file;
mod snapshot;

pub use file::StateFile;
pub use snapshot::{PersistedState, RestoreDefaults};

#[cfg(test)]
mod tests;
