use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::errors::TrackerError;
use crate::store::Store;

/// An in-memory slot for tests and for callers that do not want
/// anything on disk.
#[derive(Debug, Default)]
pub struct MockStore {
    pub(crate) slot: RwLock<Option<String>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Starts with `snapshot` already in the slot.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        MockStore {
            slot: RwLock::new(Some(snapshot.into())),
            ..Default::default()
        }
    }

    /// Makes every later `load` and `save` fail.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The current contents of the slot.
    pub fn contents(&self) -> Option<String> {
        self.slot.read().map(|slot| (*slot).clone()).unwrap_or(None)
    }

    /// How many saves have succeeded.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), TrackerError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(io::Error::new(io::ErrorKind::Other, "mock store is failing").into())
        } else {
            Ok(())
        }
    }
}

impl Store for MockStore {
    fn load(&self) -> Result<Option<String>, TrackerError> {
        self.check()?;

        Ok(self.contents())
    }

    fn save(&self, snapshot: &str) -> Result<(), TrackerError> {
        self.check()?;

        let mut slot = self
            .slot
            .write()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "mock store lock poisoned"))?;
        *slot = Some(snapshot.to_owned());
        self.saves.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }
}
