use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::db::repositories::collection::{Collection, CollectionRepository};
use crate::error::{AppError, AppResult};

/// Process-local repository that keeps each collection as a serialized JSON payload,
/// with switches to simulate storage faults.
pub struct InMemoryRepository<T> {
    collection: Collection,
    payload: RwLock<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            payload: RwLock::new(None),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            _marker: PhantomData,
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Overwrites the stored payload verbatim, e.g. with malformed JSON.
    pub fn set_raw_payload(&self, raw: impl Into<String>) {
        if let Ok(mut guard) = self.payload.write() {
            *guard = Some(raw.into());
        }
    }

    pub fn raw_payload(&self) -> Option<String> {
        self.payload.read().ok().and_then(|guard| guard.clone())
    }
}

impl<T> CollectionRepository<T> for InMemoryRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    fn collection(&self) -> Collection {
        self.collection
    }

    fn load(&self) -> AppResult<Option<Vec<T>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::storage(self.collection.key(), "read unavailable"));
        }

        let guard = self
            .payload
            .read()
            .map_err(|_| AppError::storage(self.collection.key(), "lock poisoned"))?;

        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn replace(&self, records: &[T]) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::storage(self.collection.key(), "quota exceeded"));
        }

        let raw = serde_json::to_string(records)?;
        let mut guard = self
            .payload
            .write()
            .map_err(|_| AppError::storage(self.collection.key(), "lock poisoned"))?;
        *guard = Some(raw);
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .payload
            .write()
            .map_err(|_| AppError::storage(self.collection.key(), "lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
