use outlay_lib::models::Session;
use outlay_lib::session::{SessionKey, SessionStore};
use web_sys::Storage;

use crate::utils::local_storage;

/// Session kept in the browser's `localStorage`, one entry per key.
pub struct LocalSessionStore {
    storage: Storage,
}

impl LocalSessionStore {
    pub fn new() -> Self {
        Self {
            storage: local_storage(),
        }
    }
}

impl SessionStore for LocalSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.storage.get(key.as_str()).unwrap_or_else(|e| {
            error!("error reading {} from storage: {:?}", key.as_str(), e);
            None
        })
    }

    fn set(&self, session: &Session) {
        for (key, value) in session.entries() {
            if let Err(e) = self.storage.set(key.as_str(), &value) {
                error!("error writing {} to storage: {:?}", key.as_str(), e);
            }
        }
    }

    fn clear(&self) {
        for key in SessionKey::ALL {
            if let Err(e) = self.storage.delete(key.as_str()) {
                error!("error removing {} from storage: {:?}", key.as_str(), e);
            }
        }
    }
}
