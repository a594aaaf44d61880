// Validation utilities module
// Provides custom validation functions for domain-specific rules

use validator::ValidationError;

/// Inclusive bounds of a review rating
pub const MIN_REVIEW_RATING: f64 = 1.0;
pub const MAX_REVIEW_RATING: f64 = 10.0;

/// Validates that a review rating is finite and between 1 and 10 inclusive
pub fn validate_review_rating(rating: f64) -> Result<(), ValidationError> {
    if (MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

/// Validates that a catalogue item's static rating is between 0 and 10
pub fn validate_static_rating(rating: f64) -> Result<(), ValidationError> {
    if (0.0..=10.0).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::new("rating_out_of_range"))
    }
}

/// Validates that a genre list has no blank entries
pub fn validate_genres(genres: &Vec<String>) -> Result<(), ValidationError> {
    if genres.iter().any(|genre| genre.trim().is_empty()) {
        Err(ValidationError::new("blank_genre"))
    } else {
        Ok(())
    }
}

/// Symbols allowed in a password besides ASCII letters and digits
const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Validates password strength: at least 8 characters drawn from ASCII
/// letters, digits and `!@#$%^&*`, with at least one letter and one digit
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    if !allowed {
        return Err(ValidationError::new("password_charset"));
    }

    let long_enough = password.chars().count() >= 8;
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}
