//! Staging area for imported files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ImportError;

use super::model::BlobHandle;

pub struct BlobStore {
    dir: PathBuf,
}

impl BlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `source` into the staging directory under a fresh name.
    pub fn stage(&self, source: &Path) -> Result<BlobHandle, ImportError> {
        let stage_err = |e| ImportError::Stage {
            path: source.to_path_buf(),
            source: e,
        };

        fs::create_dir_all(&self.dir).map_err(stage_err)?;

        let mut name = uuid::Uuid::new_v4().to_string();
        if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
            name.push('.');
            name.push_str(&ext.to_ascii_lowercase());
        }
        let target = self.dir.join(name);
        fs::copy(source, &target).map_err(stage_err)?;

        tracing::debug!(from = %source.display(), to = %target.display(), "staged import");
        Ok(BlobHandle::new(target))
    }
}
