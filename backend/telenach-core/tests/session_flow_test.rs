// Session Flow Tests
//
// Signup, login, logout and restore against both store backends:
// 1. Signup persists the account under `<app>_users`
// 2. Login finds it again, ignoring username case
// 3. The signed-in user survives a relaunch via `<app>_user`

#[cfg(test)]
mod session_flow_tests {
    use error_types::ServiceError;
    use std::sync::Arc;
    use telenach_core::models::User;
    use telenach_core::services::SessionManager;
    use telenach_core::storage::{FileStore, JsonStoreExt, KeyValueStore, MemoryStore, SharedStore};
    use telenach_core::validators::SignupInput;
    use telenach_core::{AppError, Config};

    fn input<'a>(username: &'a str) -> SignupInput<'a> {
        SignupInput {
            display_name: "Jane",
            username,
            password: "password1",
            confirm_password: "password1",
            birth_year: "1990",
        }
    }

    #[test]
    fn test_jane_signs_up_and_logs_back_in() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = SessionManager::new(store, &Config::default());

        session.signup(&input("@jane")).expect("signup");
        session.logout().unwrap();

        let user = session.login("@jane", "password1").expect("login");
        assert_eq!(user.display_name, "Jane");
    }

    #[test]
    fn test_duplicate_username_is_conflict_and_store_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let mut session = SessionManager::new(store.clone(), &Config::default());
        session.signup(&input("@jane")).unwrap();
        let before = store.get("telenach_users").unwrap();

        for taken in ["@jane", "@JANE", "Jane", "  jane  "] {
            let err = session.signup(&input(taken)).unwrap_err();
            assert!(matches!(err, AppError::UsernameTaken(_)), "{taken}");
            assert!(matches!(ServiceError::from(err), ServiceError::Conflict(_)));
        }
        assert_eq!(store.get("telenach_users").unwrap(), before);
    }

    #[test]
    fn test_validation_failures_do_not_touch_store() {
        let store = Arc::new(MemoryStore::new());
        let mut session = SessionManager::new(store.clone(), &Config::default());

        let mismatch = SignupInput {
            confirm_password: "password2",
            ..input("@jane")
        };
        let short = SignupInput {
            password: "pw",
            confirm_password: "pw",
            ..input("@jane")
        };
        let nameless = SignupInput {
            display_name: "  ",
            ..input("@jane")
        };

        for bad in [mismatch, short, nameless] {
            assert!(matches!(session.signup(&bad), Err(AppError::Validation(_))));
        }
        assert!(store.is_empty());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_wrong_password_is_auth_error() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut session = SessionManager::new(store, &Config::default());
        session.signup(&input("@jane")).unwrap();
        session.logout().unwrap();

        let err = session.login("@jane", "password2").unwrap_err();
        assert_eq!(ServiceError::from(err), ServiceError::Unauthorized);
    }

    #[test]
    fn test_app_key_prefixes_storage_keys() {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            app_key: "demo".to_string(),
            ..Config::default()
        };
        let mut session = SessionManager::new(store.clone(), &config);
        session.signup(&input("@jane")).unwrap();

        let users: Option<Vec<User>> = store.get_json("demo_users").unwrap();
        assert_eq!(users.map(|u| u.len()), Some(1));
        assert!(store.get("demo_user").unwrap().is_some());
        assert!(store.get("telenach_user").unwrap().is_none());
    }

    #[test]
    fn test_session_survives_relaunch_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");

        {
            let store: SharedStore = Arc::new(FileStore::open(&path).unwrap());
            let mut session = SessionManager::new(store, &Config::default());
            session.signup(&input("@jane")).unwrap();
        }

        let store: SharedStore = Arc::new(FileStore::open(&path).unwrap());
        let mut session = SessionManager::new(store.clone(), &Config::default());
        let restored = session.restore().unwrap().cloned().expect("restored session");
        assert_eq!(restored.username, "@jane");
        assert!(restored.password_hash.is_none());

        session.logout().unwrap();
        let store: SharedStore = Arc::new(FileStore::open(&path).unwrap());
        let mut session = SessionManager::new(store, &Config::default());
        assert!(session.restore().unwrap().is_none());
        // registered account is still there
        assert!(session.login("@jane", "password1").is_ok());
    }
}
