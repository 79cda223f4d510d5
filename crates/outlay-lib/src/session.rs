use std::{cell::RefCell, collections::HashMap};

use crate::models::{Role, Session};

/// Keys under which the session lives in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    Token,
    Role,
    UserId,
    UserName,
    CompanyId,
}

impl SessionKey {
    pub const ALL: [SessionKey; 5] = [
        SessionKey::Token,
        SessionKey::Role,
        SessionKey::UserId,
        SessionKey::UserName,
        SessionKey::CompanyId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::Token => "token",
            SessionKey::Role => "role",
            SessionKey::UserId => "userId",
            SessionKey::UserName => "userName",
            SessionKey::CompanyId => "companyId",
        }
    }
}

impl Session {
    /// The fields that are present, paired with their storage key.
    pub fn entries(&self) -> Vec<(SessionKey, String)> {
        [
            (SessionKey::Token, self.token.clone()),
            (SessionKey::Role, self.role.map(|role| role.as_str().to_string())),
            (SessionKey::UserId, self.user_id.clone()),
            (SessionKey::UserName, self.user_name.clone()),
            (SessionKey::CompanyId, self.company_id.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// Key/value persistence for the session.
///
/// `set` only writes the fields that are present. `clear` removes every key,
/// and implementations must not let a caller observe a partially cleared
/// session.
pub trait SessionStore {
    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&self, session: &Session);

    fn clear(&self);

    fn token(&self) -> Option<String> {
        self.get(SessionKey::Token).filter(|token| !token.is_empty())
    }

    fn role(&self) -> Option<Role> {
        self.get(SessionKey::Role).and_then(|role| role.parse().ok())
    }

    fn is_authenticated(&self) -> bool {
        self.load().is_authenticated()
    }

    fn load(&self) -> Session {
        Session {
            token: self.token(),
            role: self.role(),
            user_id: self.get(SessionKey::UserId),
            user_name: self.get(SessionKey::UserName),
            company_id: self.get(SessionKey::CompanyId),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    values: RefCell<HashMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        store.set(session);
        store
    }

    /// Stores a raw value, bypassing the typed session.
    pub fn insert(&self, key: SessionKey, value: impl Into<String>) {
        self.values.borrow_mut().insert(key, value.into());
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.values.borrow().get(&key).cloned()
    }

    fn set(&self, session: &Session) {
        let mut values = self.values.borrow_mut();
        for (key, value) in session.entries() {
            values.insert(key, value);
        }
    }

    fn clear(&self) {
        self.values.borrow_mut().clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn session() -> Session {
        Session {
            token: Some("tok".to_string()),
            role: Some(Role::Employee),
            user_id: Some("u1".to_string()),
            user_name: Some("Jane".to_string()),
            company_id: Some("c1".to_string()),
        }
    }

    #[test]
    fn test_set_and_load() {
        let store = MemorySessionStore::with_session(&session());
        assert_eq!(store.load(), session());
        assert_eq!(store.get(SessionKey::UserName).as_deref(), Some("Jane"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_set_writes_only_present_fields() {
        let store = MemorySessionStore::with_session(&session());
        store.set(&Session {
            user_name: Some("Janet".to_string()),
            ..Default::default()
        });

        let loaded = store.load();
        assert_eq!(loaded.user_name.as_deref(), Some("Janet"));
        assert_eq!(loaded.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_clear_removes_every_key() {
        let store = MemorySessionStore::with_session(&session());
        store.clear();

        for key in SessionKey::ALL {
            assert_eq!(store.get(key), None, "{:?} should be cleared", key);
        }
        assert!(!store.is_authenticated());
        assert_eq!(store.load(), Session::default());
    }

    #[test]
    fn test_store_authentication_follows_loaded_session() {
        let session = Session {
            token: Some("".to_string()),
            role: Some(Role::Admin),
            ..Default::default()
        };
        assert!(!session.is_authenticated());

        let store = MemorySessionStore::with_session(&Session {
            token: Some("tok".to_string()),
            ..Default::default()
        });
        assert!(store.load().is_authenticated());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let store = MemorySessionStore::new();
        store.insert(SessionKey::Token, "");
        store.insert(SessionKey::Role, "admin");
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_unknown_role_reads_as_none() {
        let store = MemorySessionStore::new();
        store.insert(SessionKey::Role, "superuser");
        assert_eq!(store.role(), None);
    }
}
