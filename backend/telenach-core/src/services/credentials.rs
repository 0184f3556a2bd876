//! Local credential store: the registered-user "database".
//!
//! Users live as one JSON array under `<app>_users`. Lookups are by username,
//! ignoring case.

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::storage::{JsonStoreExt, SharedStore};
use crate::validators::username_key;

#[derive(Clone)]
pub struct CredentialStore {
    store: SharedStore,
    key: String,
}

impl CredentialStore {
    pub fn new(store: SharedStore, users_key: impl Into<String>) -> Self {
        Self {
            store,
            key: users_key.into(),
        }
    }

    pub fn all(&self) -> AppResult<Vec<User>> {
        Ok(self.store.get_json::<Vec<User>>(&self.key)?.unwrap_or_default())
    }

    pub fn find(&self, username: &str) -> AppResult<Option<User>> {
        let wanted = username_key(username);
        Ok(self
            .all()?
            .into_iter()
            .find(|u| u.matches_username(&wanted)))
    }

    pub fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.find(username)?.is_some())
    }

    /// Append a new user. The username must not be registered yet.
    pub fn insert(&self, user: User) -> AppResult<()> {
        let mut users = self.all()?;
        let wanted = username_key(&user.username);
        if users.iter().any(|u| u.matches_username(&wanted)) {
            return Err(AppError::UsernameTaken(user.username));
        }

        users.push(user);
        self.store.set_json(&self.key, &users)?;
        tracing::debug!(count = users.len(), "credential store updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn user(username: &str) -> User {
        User {
            id: format!("u_{}", username.trim_start_matches('@')),
            display_name: "Test".into(),
            username: username.into(),
            birth_year: String::new(),
            avatar: String::new(),
            bio: None,
            password_hash: Some("hash".into()),
            stories: None,
        }
    }

    #[test]
    fn test_empty_store_has_no_users() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()), "telenach_users");
        assert!(creds.all().unwrap().is_empty());
        assert!(!creds.exists("@jane").unwrap());
    }

    #[test]
    fn test_insert_and_find_ignoring_case() {
        let creds = CredentialStore::new(Arc::new(MemoryStore::new()), "telenach_users");
        creds.insert(user("@Jane")).unwrap();

        assert!(creds.exists("jane").unwrap());
        assert!(creds.exists("@JANE").unwrap());
        assert_eq!(creds.find("@jane").unwrap().unwrap().username, "@Jane");
    }

    #[test]
    fn test_duplicate_insert_leaves_store_untouched() {
        let store = Arc::new(MemoryStore::new());
        let creds = CredentialStore::new(store.clone(), "telenach_users");
        creds.insert(user("@jane")).unwrap();
        let before = store.get("telenach_users").unwrap();

        let err = creds.insert(user("@JANE")).unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken(_)));
        assert_eq!(store.get("telenach_users").unwrap(), before);
    }
}
