use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} missing or not writable: {message}")]
    OutputDir { path: PathBuf, message: String },
    #[error("destination {0:?} has no parent directory")]
    NoParent(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists; create if missing. An existing directory is fine.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let fail = |message: String| PersistError::OutputDir {
        path: dir.to_path_buf(),
        message,
    };
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| fail(e.to_string()))?;
        if !meta.is_dir() {
            return Err(fail("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| fail(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| fail(e.to_string()))?;
    Ok(())
}

/// A file being written next to its final location.
///
/// Bytes go to a temp file in the destination's directory; [`StagedFile::commit`]
/// renames it over the target, so an interrupted retrieval never leaves a
/// truncated artifact under the final name.
pub struct StagedFile {
    tmp: NamedTempFile,
    target: PathBuf,
    written: u64,
}

impl StagedFile {
    pub fn create(target: &Path) -> Result<Self, PersistError> {
        let dir = target
            .parent()
            .ok_or_else(|| PersistError::NoParent(target.to_path_buf()))?;
        let tmp = NamedTempFile::new_in(dir)?;
        Ok(Self {
            tmp,
            target: target.to_path_buf(),
            written: 0,
        })
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), PersistError> {
        self.tmp.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and moves the staged bytes to the target, replacing any existing file.
    pub fn commit(mut self) -> Result<PathBuf, PersistError> {
        self.tmp.flush()?;
        self.tmp.as_file_mut().sync_all()?;

        if self.target.exists() {
            fs::remove_file(&self.target)?;
        }
        self.tmp
            .persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(self.target)
    }
}
