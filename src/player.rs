//! Player module: the playback queue state machine and its drivers.
//!
//! `Reducer` maps `(PlayerState, Action)` to the next `PlayerState`,
//! `Store` wraps it with imperative methods and persistence, and
//! `PlaybackController` keeps a transport in step with the store.

mod action;
mod controller;
mod reducer;
mod shuffle;
mod state;
mod store;

pub use action::Action;
pub use controller::PlaybackController;
pub use reducer::{PlaybackRules, Reducer};
pub use state::PlayerState;
pub use store::Store;
