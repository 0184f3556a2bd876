use error_types::ServiceError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("username {0} is already taken")]
    UsernameTaken(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("not signed in")]
    NotSignedIn,

    #[error("maximum {max} moderators allowed")]
    ModeratorLimit { max: usize },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("chat not found: {0}")]
    ChatNotFound(String),

    #[error("room not found: {0}")]
    RoomNotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Serialization error: {}", err);
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {}", err);
        AppError::Storage(err.to_string())
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => ServiceError::Validation(msg),
            AppError::UsernameTaken(_) => ServiceError::Conflict(err.to_string()),
            AppError::InvalidCredentials | AppError::NotSignedIn => ServiceError::Unauthorized,
            AppError::ModeratorLimit { .. } => ServiceError::Capacity(err.to_string()),
            AppError::Forbidden(msg) => ServiceError::Forbidden(msg),
            AppError::ChatNotFound(_) | AppError::RoomNotFound(_) => {
                ServiceError::NotFound(err.to_string())
            }
            AppError::Storage(msg) | AppError::Serialization(msg) => ServiceError::Storage(msg),
            AppError::Config(msg) => ServiceError::Internal(msg),
        }
    }
}
