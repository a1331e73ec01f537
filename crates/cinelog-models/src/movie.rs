use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::status::WatchStatus;
use crate::validation::{check_rating, ValidationError};

/// One tracked film and the user's metadata about it.
///
/// Field names are serialized in camelCase so the stored JSON array keeps
/// the layout older installs wrote. Timestamps are kept as the stored
/// strings; use the `*_utc` accessors to parse them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub year: String, // Display string, not validated as numeric
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub watched: bool,
    pub date_added: String, // ISO-8601, set once at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_watched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>, // 0-10 inclusive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewatch: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_from_recent: Option<bool>,
}

/// Render a timestamp the way stored records carry it
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Movie {
    /// A fresh, unwatched, non-favorite record as the add flow creates it
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
        genres: Vec<String>,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: year.into(),
            genres,
            watched: false,
            date_added: format_timestamp(added_at),
            date_watched: None,
            is_favorite: Some(false),
            rating: None,
            review: None,
            notes: None,
            rewatch: None,
            hide_from_recent: None,
        }
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite.unwrap_or(false)
    }

    pub fn is_hidden_from_recent(&self) -> bool {
        self.hide_from_recent.unwrap_or(false)
    }

    pub fn status(&self) -> WatchStatus {
        WatchStatus::of(self.watched)
    }

    pub fn date_added_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_added)
    }

    pub fn date_watched_utc(&self) -> Option<DateTime<Utc>> {
        self.date_watched.as_deref().and_then(parse_timestamp)
    }

    /// Numeric year for sorting; `None` when the display string isn't a number
    pub fn year_number(&self) -> Option<i32> {
        self.year.trim().parse().ok()
    }

    /// Record-level checks applied before a record is accepted into a collection
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        Ok(())
    }

    /// Checks for a record replacing `previous`.
    ///
    /// Only changed fields are held to [`Movie::validate`]'s rules, so a record
    /// read from an older payload with a blank title or an out-of-range rating
    /// can still be toggled or repaired.
    pub fn validate_replacing(&self, previous: &Movie) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.title != previous.title && self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.rating != previous.rating {
            if let Some(rating) = self.rating {
                check_rating(rating)?;
            }
        }
        Ok(())
    }

    /// Stricter checks for the add and edit forms
    pub fn validate_details(title: &str, year: &str, genres: &[String]) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if year.trim().is_empty() {
            return Err(ValidationError::EmptyYear);
        }
        if genres.is_empty() {
            return Err(ValidationError::NoGenres);
        }
        Ok(())
    }

    /// Flip watched state; marking watched stamps `date_watched`, unmarking clears it
    pub fn toggled_watched(&self, now: DateTime<Utc>) -> Movie {
        let mut movie = self.clone();
        movie.watched = !self.watched;
        movie.date_watched = if movie.watched {
            Some(format_timestamp(now))
        } else {
            None
        };
        movie
    }

    pub fn toggled_favorite(&self) -> Movie {
        let mut movie = self.clone();
        movie.is_favorite = Some(!self.is_favorite());
        movie
    }

    /// Apply a rating and review. A missing rating keeps the current one.
    pub fn rated(&self, rating: Option<f64>, review: Option<String>) -> Result<Movie, ValidationError> {
        let mut movie = self.clone();
        if let Some(rating) = rating {
            movie.rating = Some(check_rating(rating)?);
        }
        if review.is_some() {
            movie.review = review;
        }
        Ok(movie)
    }

    pub fn with_notes(&self, notes: Option<String>) -> Movie {
        let mut movie = self.clone();
        movie.notes = notes;
        movie
    }

    pub fn hidden_from_recent(&self) -> Movie {
        let mut movie = self.clone();
        movie.hide_from_recent = Some(true);
        movie
    }

    /// Replace title, year and genres; watched state and history are kept
    pub fn edited(&self, title: String, year: String, genres: Vec<String>) -> Result<Movie, ValidationError> {
        Self::validate_details(&title, &year, &genres)?;
        let mut movie = self.clone();
        movie.title = title;
        movie.year = year;
        movie.genres = genres;
        Ok(movie)
    }
}
