//! Collaborator seams of the engine
//!
//! The engine core performs no I/O. Everything that touches a device, a file
//! or a clock is reached through one of these traits so the host decides how
//! it is done.
//!
//! Sensor traits live next to their sample types in [`crate::sensors`].

pub use crate::time::TimeSource;

use crate::state::Snapshot;

/// Durable storage for the engine snapshot
///
/// Implementations decide the medium (file, flash page, key-value store).
/// A missing snapshot is `Ok(None)`, not an error. The engine treats any
/// error from `load` the same as a missing snapshot and starts from defaults.
pub trait SnapshotStore {
    /// Storage-specific failure
    type Error;

    /// Read the last saved snapshot, if any
    fn load(&mut self) -> Result<Option<Snapshot>, Self::Error>;

    /// Replace the saved snapshot
    fn save(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// In-memory store, mostly useful in tests and on targets without storage
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<Snapshot>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently held (0 or 1)
    pub fn len(&self) -> usize {
        usize::from(self.slot.is_some())
    }

    /// True when nothing was saved yet
    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

impl SnapshotStore for MemoryStore {
    type Error = core::convert::Infallible;

    fn load(&mut self) -> Result<Option<Snapshot>, Self::Error> {
        Ok(self.slot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error> {
        self.slot = Some(snapshot.clone());
        Ok(())
    }
}
