use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

use super::snapshot::PersistedState;

/// JSON file holding the persisted player state.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state. A missing file is not an error.
    pub fn load(&self) -> Result<Option<PersistedState>, StorageError> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|e| StorageError::Parse {
                path: self.path.clone(),
                source: e,
            })
    }

    /// Read the state, falling back to an empty one on any failure.
    pub fn load_or_default(&self) -> PersistedState {
        match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "no saved state, starting fresh");
                PersistedState::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load saved state, starting fresh");
                PersistedState::default()
            }
        }
    }

    /// Write the state through a temporary file so a crash never leaves a
    /// truncated file behind.
    pub fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        let io_err = |e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let file = fs::File::create(&tmp).map_err(io_err)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, state)?;
            writer.flush().map_err(io_err)?;
        }
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}
