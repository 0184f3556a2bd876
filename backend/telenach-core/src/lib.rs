pub mod app;
pub mod config;
pub mod error;
pub mod guards;
pub mod logging;
pub mod models;
pub mod router;
pub mod security;
pub mod seed;
pub mod services;
pub mod storage;
pub mod validators;

pub use app::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
