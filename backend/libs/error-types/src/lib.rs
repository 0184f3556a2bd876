use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shared error taxonomy for the client core.
///
/// Every failure an action can produce is one of these variants. None of them
/// are fatal: the UI renders [`ErrorResponse::message`] inline and the user
/// resubmits the action.
///
/// ```ignore
/// match session.login("@jane", "password1") {
///     Ok(user) => show_home(user),
///     Err(e) => show_inline(ServiceError::from(e).to_response()),
/// }
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    Unauthorized,

    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_codes::VALIDATION_FAILED,
            ServiceError::Conflict(_) => error_codes::USER_ALREADY_EXISTS,
            ServiceError::Unauthorized => error_codes::INVALID_CREDENTIALS,
            ServiceError::Capacity(_) => error_codes::MODERATOR_LIMIT_REACHED,
            ServiceError::Forbidden(_) => error_codes::INSUFFICIENT_ROLE,
            ServiceError::NotFound(_) => error_codes::NOT_FOUND,
            ServiceError::Storage(_) => error_codes::STORAGE_ERROR,
            ServiceError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => error_types::VALIDATION_ERROR,
            ServiceError::Conflict(_) => error_types::CONFLICT_ERROR,
            ServiceError::Unauthorized => error_types::AUTHENTICATION_ERROR,
            ServiceError::Capacity(_) => error_types::CAPACITY_ERROR,
            ServiceError::Forbidden(_) => error_types::AUTHORIZATION_ERROR,
            ServiceError::NotFound(_) => error_types::NOT_FOUND_ERROR,
            ServiceError::Storage(_) | ServiceError::Internal(_) => error_types::CLIENT_ERROR,
        }
    }

    /// Storage and internal failures are the only ones worth logging at error
    /// level; the rest are ordinary user mistakes.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ServiceError::Storage(_) | ServiceError::Internal(_))
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::new(&self.to_string(), self.error_type(), self.error_code())
    }
}

/// Inline error payload rendered by the view layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// User-facing message
    pub message: String,

    /// Error category, one of [`error_types`]
    pub error_type: String,

    /// Stable code for localisation, one of [`error_codes`]
    pub code: String,

    /// Extra detail, only filled in debug builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(message: &str, error_type: &str, code: &str) -> Self {
        Self {
            message: message.to_string(),
            error_type: error_type.to_string(),
            code: code.to_string(),
            details: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

pub mod error_codes {
    // Session
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const USER_ALREADY_EXISTS: &str = "USER_ALREADY_EXISTS";
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";

    // Groups
    pub const MODERATOR_LIMIT_REACHED: &str = "MODERATOR_LIMIT_REACHED";
    pub const INSUFFICIENT_ROLE: &str = "INSUFFICIENT_ROLE";

    // Lookups
    pub const NOT_FOUND: &str = "NOT_FOUND";

    // Local system
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

pub mod error_types {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const CONFLICT_ERROR: &str = "conflict_error";
    pub const AUTHENTICATION_ERROR: &str = "authentication_error";
    pub const CAPACITY_ERROR: &str = "capacity_error";
    pub const AUTHORIZATION_ERROR: &str = "authorization_error";
    pub const NOT_FOUND_ERROR: &str = "not_found_error";
    pub const CLIENT_ERROR: &str = "client_error";
}
