pub mod genre;
pub mod movie;
pub mod status;
pub mod validation;

pub use genre::{is_known_genre, GENRES};
pub use movie::{format_timestamp, Movie};
pub use status::WatchStatus;
pub use validation::{check_rating, parse_rating, ValidationError, MAX_RATING, MIN_RATING};
