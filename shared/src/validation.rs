//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

use crate::types::SignUpRequest;
use validator::Validate;

/// Maximum username length in characters
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Minimum password length for new accounts, in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate username shape
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username cannot be blank".to_string());
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err("Username too long".to_string());
    }
    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("Username cannot contain whitespace".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password cannot be blank".to_string());
    }
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 8 characters".to_string());
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a sign-up request, reporting the first offending field
pub fn validate_sign_up(request: &SignUpRequest) -> Result<(), ValidationError> {
    if let Err(errors) = request.validate() {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "request".to_string());
        return Err(ValidationError::new(&field, &errors.to_string()));
    }
    validate_username(&request.username).map_err(|m| ValidationError::new("username", &m))?;
    validate_password(&request.password).map_err(|m| ValidationError::new("password", &m))?;
    Ok(())
}

/// Validation error with a field reference
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.field, self.message)
    }
}
