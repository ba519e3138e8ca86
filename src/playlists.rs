//! Playlist registry: favorites, recently played and named playlists.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
