//! In-memory key-value store, for tests and throwaway sessions.

use kontakt_storage_interface::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("injected read failure for key '{0}'")]
    Read(String),
    #[error("injected write failure for key '{0}'")]
    Write(String),
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `value` under `key`.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.borrow_mut().insert(key.into(), value.into());
        store
    }

    /// Makes every subsequent read fail until turned off again.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Raw stored value, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type ReadError = MockError;
    type WriteError = MockError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::ReadError> {
        if self.fail_reads.get() {
            return Err(MockError::Read(key.into()));
        }
        log::debug!("mock get {}", key);
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::WriteError> {
        if self.fail_writes.get() {
            return Err(MockError::Write(key.into()));
        }
        log::debug!("mock set {} ({} bytes)", key, value.len());
        self.entries.borrow_mut().insert(key.into(), value.into());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::WriteError> {
        if self.fail_writes.get() {
            return Err(MockError::Write(key.into()));
        }
        log::debug!("mock remove {}", key);
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
