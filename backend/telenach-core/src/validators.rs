/// Input validation for onboarding forms
use crate::error::{AppError, AppResult};

/// Trim and ensure the `@` prefix. Casing is preserved.
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{}", trimmed)
    }
}

/// Lowercased form used for uniqueness and lookup.
pub fn username_key(raw: &str) -> String {
    normalize_username(raw).to_lowercase()
}

#[derive(Debug, Clone)]
pub struct SignupInput<'a> {
    pub display_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub birth_year: &'a str,
}

pub fn validate_signup(input: &SignupInput<'_>, password_min_len: usize) -> AppResult<()> {
    if input.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name is required".to_string()));
    }

    if input.username.trim().trim_start_matches('@').is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    if input.password.chars().count() < password_min_len {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            password_min_len
        )));
    }

    if input.password != input.confirm_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }

    Ok(())
}
