//! JSON file snapshot store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use enviromon_core::traits::SnapshotStore;
use enviromon_core::Snapshot;

use crate::ConnectorError;

/// Snapshot kept as pretty-printed JSON in a single file
///
/// Saves go through a sibling `.tmp` file that is renamed over the target,
/// so a reader never sees a half-written snapshot.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    type Error = ConnectorError;

    fn load(&mut self) -> Result<Option<Snapshot>, Self::Error> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_slice(&bytes)?;
        log::debug!("Loaded snapshot from {}", self.path.display());
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        log::debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}
