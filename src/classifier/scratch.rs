//! Scratch files handed to the external classifier. A [`ScratchFile`] never
//! replaces an existing file and removes its path when dropped.

use crate::error::{PredictError, Result};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Scratch file names of one strategy instance, all derived from its dataset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    pub training: PathBuf,
    pub model: PathBuf,
    pub predictions_in: PathBuf,
    pub predictions_out: PathBuf,
}

impl ScratchPaths {
    pub fn new(dir: &Path, dataset_name: &str, strategy_name: &str) -> Self {
        let name = |suffix: &str| dir.join(format!("{} - {}{}", dataset_name, strategy_name, suffix));
        Self {
            training: name("Training"),
            model: name("Model"),
            predictions_in: name("PredictionsIn"),
            predictions_out: name("PredictionsOut"),
        }
    }
}

#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Create `path` with `contents`; fails if it already exists.
    pub fn create(path: PathBuf, contents: &str) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(PredictError::ScratchFileCollision { path });
            }
            Err(e) => return Err(e.into()),
        };
        let guard = Self { path };
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(guard)
    }

    /// Claim `path` for a file another process will write; fails if it already exists.
    pub fn reserve(path: PathBuf) -> Result<Self> {
        if path.exists() {
            return Err(PredictError::ScratchFileCollision { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_to_string(&self) -> Result<String> {
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed scratch file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "could not remove scratch file"),
        }
    }
}
