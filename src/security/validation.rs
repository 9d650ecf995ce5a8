//! Request Validation Module
//!
//! Provides field validation for registration, profile and resource inputs.

use regex::Regex;

use crate::error::{AppError, Result};

/// Field length limits
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const SESSION_NAME_MAX: usize = 100;

/// Request field validator
pub struct RequestValidator {
    email_regex: Regex,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    pub fn new() -> Self {
        Self {
            email_regex: Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("email regex is valid"),
        }
    }

    /// Validate username length
    pub fn validate_username(&self, username: &str) -> Result<()> {
        let len = username.chars().count();
        if len < USERNAME_MIN || len > USERNAME_MAX {
            return Err(AppError::Validation(format!(
                "Username must be between {} and {} characters",
                USERNAME_MIN, USERNAME_MAX
            )));
        }
        Ok(())
    }

    /// Validate email format
    pub fn validate_email(&self, email: &str) -> Result<()> {
        if !self.email_regex.is_match(email) {
            return Err(AppError::Validation(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        Ok(())
    }

    /// Validate password length
    pub fn validate_password(&self, password: &str) -> Result<()> {
        if password.chars().count() < PASSWORD_MIN {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                PASSWORD_MIN
            )));
        }
        Ok(())
    }

    /// Validate display name is present
    pub fn validate_full_name(&self, full_name: &str) -> Result<()> {
        if full_name.trim().is_empty() {
            return Err(AppError::Validation(
                "Full name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate session name constraints
    pub fn validate_session_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Session name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > SESSION_NAME_MAX {
            return Err(AppError::Validation(format!(
                "Session name cannot exceed {} characters",
                SESSION_NAME_MAX
            )));
        }
        Ok(())
    }

    /// Validate free-text content is present
    pub fn validate_content(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(AppError::Validation("Content cannot be empty".to_string()));
        }
        Ok(())
    }
}
