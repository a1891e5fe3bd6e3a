//! The signed-in session: a bearer token and the cached user record.
//!
//! Views never touch `localStorage` directly. They receive a [SessionContext]
//! through the Yew context and go through [SessionContext::load] before
//! rendering anything protected.

use std::rc::Rc;
#[cfg(test)]
use std::{cell::RefCell, collections::HashMap};

use crate::{
    config::{TOKEN_KEY, USER_KEY},
    error::{ApiError, SessionError},
    models::User,
};

/// A string key-value store with `localStorage` semantics.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let storage = Self::storage().ok_or(SessionError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| SessionError::Write(key.to_string()))
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// An in-process store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Read, write and clear the session. Cloning shares the underlying store.
#[derive(Clone)]
pub struct SessionContext {
    store: Rc<dyn KeyValueStore>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl SessionContext {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    /// Store a fresh session, replacing any previous one.
    pub fn save(&self, token: &str, user: &User) -> Result<(), SessionError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(USER_KEY, &user_json)?;
        tracing::info!("Session stored for user {}", user.id);
        Ok(())
    }

    /// The stored session, or `None` when the token or the user is missing.
    ///
    /// The token is not validated; the API rejects stale or forged tokens.
    pub fn load(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())?;
        let user_json = self.store.get(USER_KEY)?;
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some(Session { token, user }),
            Err(error) => {
                tracing::warn!("Ignoring unreadable stored user record: {error}");
                None
            }
        }
    }

    /// Like [SessionContext::load] but as an error views can propagate with `?`.
    pub fn require(&self) -> Result<Session, ApiError> {
        self.load().ok_or(ApiError::MissingSession)
    }

    /// Replace the cached user record and keep the token.
    pub fn update_user(&self, user: &User) -> Result<(), SessionError> {
        let user_json =
            serde_json::to_string(user).map_err(|e| SessionError::Serialize(e.to_string()))?;
        self.store.set(USER_KEY, &user_json)
    }

    pub fn clear(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        tracing::info!("Session cleared");
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        config::{TOKEN_KEY, USER_KEY},
        error::ApiError,
        session::{KeyValueStore, MemoryStore, SessionContext},
        test_utils::user,
    };

    fn context() -> (Rc<MemoryStore>, SessionContext) {
        let store = Rc::new(MemoryStore::default());
        let session = SessionContext::new(store.clone());
        (store, session)
    }

    #[test]
    fn save_then_load_returns_the_session() {
        let (_, session) = context();

        session.save("abc123", &user()).unwrap();

        let loaded = session.load().unwrap();
        assert_eq!(loaded.token, "abc123");
        assert_eq!(loaded.user, user());
    }

    #[test]
    fn save_overwrites_previous_session() {
        let (_, session) = context();
        let mut other = user();
        other.id = 2;
        other.name = "Moussa".to_string();

        session.save("first", &user()).unwrap();
        session.save("second", &other).unwrap();

        let loaded = session.load().unwrap();
        assert_eq!(loaded.token, "second");
        assert_eq!(loaded.user, other);
    }

    #[test]
    fn load_requires_token_and_user() {
        let (store, session) = context();

        store.set(TOKEN_KEY, "abc123").unwrap();
        assert_eq!(session.load(), None);

        store.remove(TOKEN_KEY);
        store
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();
        assert_eq!(session.load(), None);
        assert_eq!(session.require(), Err(ApiError::MissingSession));
    }

    #[test]
    fn unreadable_user_counts_as_missing() {
        let (store, session) = context();

        store.set(TOKEN_KEY, "abc123").unwrap();
        store.set(USER_KEY, "not json").unwrap();

        assert_eq!(session.load(), None);
    }

    #[test]
    fn fabricated_token_is_accepted_until_the_api_rejects_it() {
        let (store, session) = context();

        store.set(TOKEN_KEY, "made-up").unwrap();
        store
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();

        assert_eq!(session.load().unwrap().token, "made-up");
    }

    #[test]
    fn clear_removes_both_keys() {
        let (store, session) = context();
        session.save("abc123", &user()).unwrap();

        session.clear();

        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.get(USER_KEY), None);
        assert_eq!(session.load(), None);
    }

    #[test]
    fn update_user_keeps_the_token() {
        let (_, session) = context();
        session.save("abc123", &user()).unwrap();
        let mut renamed = user();
        renamed.name = "Awa Diop".to_string();

        session.update_user(&renamed).unwrap();

        let loaded = session.load().unwrap();
        assert_eq!(loaded.token, "abc123");
        assert_eq!(loaded.user.name, "Awa Diop");
    }
}
