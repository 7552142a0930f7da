use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::TrackerError;

pub mod mock;

/// A single persistence slot holding the whole collection as text.
pub trait Store: Send + Sync {
    /// Reads the slot. Returns `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, TrackerError>;

    /// Replaces the contents of the slot.
    fn save(&self, snapshot: &str) -> Result<(), TrackerError>;
}

/// A store that keeps the slot in one file on disk.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a new instance. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn load(&self) -> Result<Option<String>, TrackerError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temporary file next to the slot and moves it into
    /// place, so a reader never sees half a snapshot.
    fn save(&self, snapshot: &str) -> Result<(), TrackerError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(snapshot.as_bytes())?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
