use crate::{DriverError, DriverResult};
use kontakt::Contact;
use kontakt_storage_interface::KeyValueStore;

pub const DEFAULT_KEY: &str = "contactsData";

pub type Listener = Box<dyn FnMut(&[Contact])>;

/// The contact collection, persisted as one JSON array under a single key.
///
/// Every save writes the whole collection; there are no partial updates.
pub struct ContactStore<S> {
    backend: S,
    key: String,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> ContactStore<S> {
    pub fn new(backend: S) -> Self {
        Self::with_key(backend, DEFAULT_KEY)
    }

    pub fn with_key(backend: S, key: &str) -> Self {
        ContactStore {
            backend,
            key: key.into(),
            listeners: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Reads the collection. A missing or unparseable value reads as empty;
    /// only backend failures are errors.
    pub fn load(&self) -> DriverResult<S, Vec<Contact>> {
        let raw = match self.backend.get(&self.key).map_err(DriverError::StoreRead)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        match serde_json::from_str(&raw) {
            Ok(contacts) => Ok(contacts),
            Err(e) => {
                log::warn!("ignoring unreadable value under {}: {}", self.key, e);
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the persisted collection, then notifies subscribers.
    pub fn save(&mut self, contacts: &[Contact]) -> DriverResult<S, ()> {
        let raw = serde_json::to_string(contacts).map_err(DriverError::Serialization)?;
        self.backend
            .set(&self.key, &raw)
            .map_err(DriverError::StoreWrite)?;
        log::debug!("saved {} contacts under {}", contacts.len(), self.key);

        for listener in self.listeners.iter_mut() {
            listener(contacts);
        }
        Ok(())
    }

    pub fn clear(&mut self) -> DriverResult<S, ()> {
        self.backend
            .remove(&self.key)
            .map_err(DriverError::StoreWrite)?;
        log::debug!("cleared {}", self.key);

        for listener in self.listeners.iter_mut() {
            listener(&[]);
        }
        Ok(())
    }

    /// Registers `listener` to be called with the collection after every
    /// successful save or clear.
    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kontakt_storage_mock::MemoryStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn jane() -> Contact {
        Contact {
            id: 1,
            name: "Jane Doe".into(),
            contact: "123456789".into(),
            email: "jane@doe.com".into(),
            picture: "data:image/png;base64,AAAA".into(),
        }
    }

    #[test]
    fn missing_key_loads_empty() {
        let store = ContactStore::new(MemoryStore::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn garbage_loads_empty() {
        for raw in &["not json", "{}", r#"[{"id":"one"}]"#, "null", ""] {
            let store = ContactStore::new(MemoryStore::with_entry(DEFAULT_KEY, raw));
            assert!(store.load().unwrap().is_empty(), "{:?} loaded", raw);
        }
    }

    #[test]
    fn save_then_load() {
        let mut store = ContactStore::new(MemoryStore::new());
        store.save(&[jane()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![jane()]);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.backend().peek(DEFAULT_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn persisted_value_is_a_json_array() {
        let mut store = ContactStore::with_key(MemoryStore::new(), "book");
        store.save(&[jane()]).unwrap();

        let raw = store.backend().peek("book").unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["email"], "jane@doe.com");
        assert!(store.backend().peek(DEFAULT_KEY).is_none());
    }

    #[test]
    fn backend_failures_propagate() {
        let mut store = ContactStore::new(MemoryStore::new());
        store.backend().fail_writes(true);
        assert!(matches!(store.save(&[jane()]), Err(DriverError::StoreWrite(_))));

        store.backend().fail_reads(true);
        assert!(matches!(store.load(), Err(DriverError::StoreRead(_))));
    }

    #[test]
    fn subscribers_see_each_save() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = ContactStore::new(MemoryStore::new());
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |contacts| sink.borrow_mut().push(contacts.len())));

        store.save(&[jane()]).unwrap();
        store.save(&[]).unwrap();
        store.backend().fail_writes(true);
        let _ = store.save(&[jane()]);

        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn clear_removes_the_key() {
        let mut store = ContactStore::new(MemoryStore::with_entry(DEFAULT_KEY, "[]"));
        store.clear().unwrap();
        assert!(store.backend().is_empty());
    }

    #[test]
    fn subscribers_see_clear() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = ContactStore::new(MemoryStore::new());
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |contacts| sink.borrow_mut().push(contacts.len())));

        store.save(&[jane()]).unwrap();
        store.clear().unwrap();
        store.backend().fail_writes(true);
        let _ = store.clear();

        assert_eq!(*seen.borrow(), vec![1, 0]);
    }
}
