use log::warn;
use web_sys::window;

/// A single string slot per product key. Writes are best effort: a browser
/// with storage disabled just loses resume support.
pub trait SnapshotStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn clear(&self, key: &str);
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

impl SnapshotStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok()).flatten()
    }

    fn save(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    warn!("Could not write {} to local storage", key);
                }
            }
            None => warn!("Local storage unavailable, progress will not survive a reload"),
        }
    }

    fn clear(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                warn!("Could not remove {} from local storage", key);
            }
        }
    }
}

#[cfg(test)]
pub mod memory {
    use super::SnapshotStore;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// In-memory store; clones share the same map so a test can "reload"
    /// by building a second controller over it.
    #[derive(Clone, Default)]
    pub struct MemoryStore {
        items: Rc<RefCell<HashMap<String, String>>>,
    }

    impl MemoryStore {
        pub fn get(&self, key: &str) -> Option<String> {
            self.items.borrow().get(key).cloned()
        }

        pub fn put(&self, key: &str, value: &str) {
            self.items.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    impl SnapshotStore for MemoryStore {
        fn load(&self, key: &str) -> Option<String> {
            self.get(key)
        }

        fn save(&self, key: &str, value: &str) {
            self.put(key, value);
        }

        fn clear(&self, key: &str) {
            self.items.borrow_mut().remove(key);
        }
    }
}
