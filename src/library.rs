//! Library module: track model, catalog, and filesystem import.
//!
//! Tracks are discovered by scanning a directory or importing single files;
//! the `Catalog` holds every known track for the lifetime of the process.

mod blob;
mod catalog;
mod display;
mod model;
mod scan;

pub use blob::BlobStore;
pub use catalog::Catalog;
pub use display::{display_line, format_time};
pub use model::{BlobHandle, SourceLocator, Track, TrackDraft, TrackId};
pub use scan::{import_path, import_paths, scan, track_id_for_path};
