//! Session manager: signup, login, logout and session restore.
//!
//! At most one user is signed in. The signed-in user is mirrored to
//! `<app>_user` so the next launch skips onboarding.

use uuid::Uuid;

use super::CredentialStore;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::security::{encode_password, verify_password};
use crate::storage::{JsonStoreExt, KeyValueStore, SharedStore};
use crate::validators::{normalize_username, validate_signup, SignupInput};

pub struct SessionManager {
    store: SharedStore,
    credentials: CredentialStore,
    session_key: String,
    password_min_len: usize,
    current: Option<User>,
}

impl SessionManager {
    pub fn new(store: SharedStore, config: &Config) -> Self {
        Self {
            credentials: CredentialStore::new(store.clone(), config.users_key()),
            store,
            session_key: config.session_key(),
            password_min_len: config.password_min_len,
            current: None,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Register a new account and sign it in.
    pub fn signup(&mut self, input: &SignupInput<'_>) -> AppResult<User> {
        validate_signup(input, self.password_min_len)?;

        let username = normalize_username(input.username);
        if self.credentials.exists(&username)? {
            tracing::info!(user = %username, "signup rejected: username taken");
            return Err(AppError::UsernameTaken(username));
        }

        let handle = username.trim_start_matches('@').to_string();
        let user = User {
            id: format!("u_{}", Uuid::new_v4().simple()),
            display_name: input.display_name.trim().to_string(),
            username,
            birth_year: input.birth_year.trim().to_string(),
            avatar: format!("https://picsum.photos/seed/{}/200", handle),
            bio: None,
            password_hash: Some(encode_password(input.password)),
            stories: None,
        };

        self.credentials.insert(user.clone())?;
        tracing::info!(user = %user.username, user_id = %user.id, "account created");

        self.start_session(user)
    }

    pub fn login(&mut self, username: &str, password: &str) -> AppResult<User> {
        let username = normalize_username(username);
        let stored = self.credentials.find(&username)?;

        let user = match stored {
            Some(user)
                if user
                    .password_hash
                    .as_deref()
                    .is_some_and(|hash| verify_password(password, hash)) =>
            {
                user
            }
            _ => {
                tracing::info!(user = %username, "login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        tracing::info!(user = %user.username, "signed in");
        self.start_session(user)
    }

    pub fn logout(&mut self) -> AppResult<()> {
        self.store.remove(&self.session_key)?;
        if let Some(user) = self.current.take() {
            tracing::info!(user = %user.username, "signed out");
        }
        Ok(())
    }

    /// Load a persisted session, if any. A corrupt entry counts as no session.
    pub fn restore(&mut self) -> AppResult<Option<&User>> {
        match self.store.get_json::<User>(&self.session_key) {
            Ok(Some(user)) => {
                tracing::debug!(user = %user.username, "session restored");
                self.current = Some(user);
            }
            Ok(None) => self.current = None,
            Err(AppError::Serialization(e)) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                self.store.remove(&self.session_key)?;
                self.current = None;
            }
            Err(e) => return Err(e),
        }
        Ok(self.current.as_ref())
    }

    /// Replace the signed-in user's profile (e.g. after viewing their stories).
    pub fn update_current(&mut self, user: User) -> AppResult<()> {
        let user = user.public_profile();
        self.store.set_json(&self.session_key, &user)?;
        self.current = Some(user);
        Ok(())
    }

    fn start_session(&mut self, user: User) -> AppResult<User> {
        let public = user.public_profile();
        self.store.set_json(&self.session_key, &public)?;
        self.current = Some(public.clone());
        Ok(public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    fn manager() -> (Arc<MemoryStore>, SessionManager) {
        let store = Arc::new(MemoryStore::new());
        let session = SessionManager::new(store.clone(), &Config::default());
        (store, session)
    }

    fn jane<'a>() -> SignupInput<'a> {
        SignupInput {
            display_name: "Jane",
            username: "@jane",
            password: "password1",
            confirm_password: "password1",
            birth_year: "1990",
        }
    }

    #[test]
    fn test_signup_then_login() {
        let (_, mut session) = manager();
        let created = session.signup(&jane()).expect("signup");
        assert_eq!(created.display_name, "Jane");
        assert!(created.password_hash.is_none());
        assert!(session.is_signed_in());

        session.logout().unwrap();
        assert!(!session.is_signed_in());

        let user = session.login("@jane", "password1").expect("login");
        assert_eq!(user.display_name, "Jane");
        assert_eq!(user.id, created.id);
    }

    #[test]
    fn test_password_is_stored_encoded() {
        let (store, mut session) = manager();
        session.signup(&jane()).unwrap();

        let raw = store.get("telenach_users").unwrap().unwrap();
        assert!(!raw.contains("password1"));
        assert!(raw.contains(&encode_password("password1")));

        // session key never carries the hash
        let session_raw = store.get("telenach_user").unwrap().unwrap();
        assert!(!session_raw.contains("\"password\""));
    }

    #[test]
    fn test_username_gets_prefixed() {
        let (_, mut session) = manager();
        let input = SignupInput {
            username: "jane",
            ..jane()
        };
        let user = session.signup(&input).unwrap();
        assert_eq!(user.username, "@jane");
        assert_eq!(user.avatar, "https://picsum.photos/seed/jane/200");
    }

    #[test]
    fn test_duplicate_signup_is_conflict() {
        let (store, mut session) = manager();
        session.signup(&jane()).unwrap();
        let before = store.get("telenach_users").unwrap();

        let input = SignupInput {
            username: "JANE",
            ..jane()
        };
        let err = session.signup(&input).unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken(_)));
        assert_eq!(store.get("telenach_users").unwrap(), before);
    }

    #[test]
    fn test_bad_credentials() {
        let (_, mut session) = manager();
        session.signup(&jane()).unwrap();
        session.logout().unwrap();

        assert_eq!(
            session.login("@jane", "wrong-password"),
            Err(AppError::InvalidCredentials)
        );
        assert_eq!(
            session.login("@nobody", "password1"),
            Err(AppError::InvalidCredentials)
        );
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_login_ignores_username_case() {
        let (_, mut session) = manager();
        session.signup(&jane()).unwrap();
        session.logout().unwrap();

        assert!(session.login("JANE", "password1").is_ok());
    }

    #[test]
    fn test_restore_session() {
        let (store, mut session) = manager();
        session.signup(&jane()).unwrap();

        let mut relaunched = SessionManager::new(store.clone(), &Config::default());
        let restored = relaunched.restore().unwrap().cloned();
        assert_eq!(restored.map(|u| u.username), Some("@jane".to_string()));

        relaunched.logout().unwrap();
        let mut again = SessionManager::new(store, &Config::default());
        assert!(again.restore().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_session_is_discarded() {
        let (store, mut session) = manager();
        store.set("telenach_user", "not-json".into()).unwrap();

        assert!(session.restore().unwrap().is_none());
        assert!(store.get("telenach_user").unwrap().is_none());
    }
}
