use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_APP_KEY: &str = "telenach";

#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix for local storage keys (`<app>_user`, `<app>_users`)
    pub app_key: String,
    /// JSON file backing local storage; `None` keeps everything in memory
    pub store_path: Option<PathBuf>,
    pub password_min_len: usize,
    pub max_moderators: usize,
    pub toast_duration: Duration,
    /// Preload the demo directory (chats, rooms) on startup
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_key: DEFAULT_APP_KEY.to_string(),
            store_path: None,
            password_min_len: 8,
            max_moderators: 2,
            toast_duration: Duration::from_millis(3000),
            seed_demo: true,
        }
    }
}

impl Config {
    fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
        match env::var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("{name} has invalid value {raw:?}"))),
            Err(_) => Ok(default),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();
        let defaults = Self::default();

        let app_key = env::var("TELENACH_APP_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.app_key);
        let store_path = env::var("TELENACH_STORE_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let password_min_len =
            Self::parse_var("TELENACH_PASSWORD_MIN_LEN", defaults.password_min_len)?;
        let max_moderators = Self::parse_var("TELENACH_MAX_MODERATORS", defaults.max_moderators)?;
        let toast_ms = Self::parse_var(
            "TELENACH_TOAST_MS",
            defaults.toast_duration.as_millis() as u64,
        )?;
        let seed_demo = Self::parse_var("TELENACH_SEED_DEMO", defaults.seed_demo)?;

        Ok(Self {
            app_key,
            store_path,
            password_min_len,
            max_moderators,
            toast_duration: Duration::from_millis(toast_ms),
            seed_demo,
        })
    }

    pub fn session_key(&self) -> String {
        format!("{}_user", self.app_key)
    }

    pub fn users_key(&self) -> String {
        format!("{}_users", self.app_key)
    }
}
