use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download path {0} exists but is not a directory")]
    NotADirectory(PathBuf),
    #[error("could not create download directory {dir}: {source}")]
    CreateDir { dir: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Create the download directory if needed.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::NotADirectory(dir.to_path_buf()));
    }
    fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })
}

/// Writes clips into one directory. Each file is staged next to its target
/// and renamed into place, so a reader never sees a partial clip.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store `content` as `{dir}/{filename}`, replacing an earlier clip of the same name.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;
        let target = self.dir.join(filename);
        let write_err = |source| PersistError::Write {
            path: target.clone(),
            source,
        };

        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        staged.write_all(content).map_err(write_err)?;
        staged.as_file_mut().sync_all().map_err(write_err)?;
        staged.persist(&target).map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}
