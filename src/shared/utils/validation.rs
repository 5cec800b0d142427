use regex::Regex;

use crate::shared::errors::AppError;

/// Providers reject passwords shorter than this
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub struct Validator;

impl Validator {
    pub fn validate_search_query(query: &str) -> Result<(), AppError> {
        if query.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }
        if query.len() > 255 {
            return Err(AppError::ValidationError(
                "Search query too long (max 255 characters)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_score(score: f32) -> Result<(), AppError> {
        if !(0.0..=10.0).contains(&score) {
            return Err(AppError::ValidationError(
                "Score must be between 0 and 10".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_anime_id(id: i64) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::ValidationError(
                "Anime ID must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_page(page: u32) -> Result<(), AppError> {
        if page == 0 {
            return Err(AppError::ValidationError(
                "Page numbers start at 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_email(email: &str) -> Result<(), AppError> {
        let re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .map_err(|e| AppError::InternalError(format!("Invalid email pattern: {}", e)))?;
        if !re.is_match(email.trim()) {
            return Err(AppError::ValidationError(
                "Email address is not valid".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    pub fn validate_display_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Display name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > 50 {
            return Err(AppError::ValidationError(
                "Display name too long (max 50 characters)".to_string(),
            ));
        }
        Ok(())
    }
}
