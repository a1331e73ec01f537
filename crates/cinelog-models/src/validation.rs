use thiserror::Error;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("movie id must not be empty")]
    EmptyId,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("year must not be empty")]
    EmptyYear,

    #[error("at least one genre is required")]
    NoGenres,

    #[error("rating must be between 0 and 10, got {0}")]
    RatingOutOfRange(f64),

    #[error("rating must be a number, got '{0}'")]
    RatingNotANumber(String),
}

/// Check a rating against the inclusive 0-10 scale
pub fn check_rating(rating: f64) -> Result<f64, ValidationError> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(ValidationError::RatingOutOfRange(rating))
    }
}

/// Parse user-entered rating text such as "7.5"
pub fn parse_rating(input: &str) -> Result<f64, ValidationError> {
    let trimmed = input.trim();
    let rating: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::RatingNotANumber(trimmed.to_string()))?;
    check_rating(rating)
}
