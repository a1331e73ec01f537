// Read-only views over a snapshot of the collection

use cinelog_models::{Movie, WatchStatus};
use std::cmp::Ordering;

/// How many movies the "recent additions" view shows
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Case-insensitive title order
    Alphabetical,
    /// Newest release year first; non-numeric years last
    Year,
    /// Most recently added first
    #[default]
    DateAdded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FavoriteSort {
    /// Highest rating first; unrated counts as zero
    #[default]
    Rating,
    Title,
}

/// Descending order for optional keys, with missing keys last
fn descending<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_title(a: &Movie, b: &Movie) -> Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

fn by_date_added(a: &Movie, b: &Movie) -> Ordering {
    descending(a.date_added_utc(), b.date_added_utc())
}

pub fn sort_movies(movies: &mut [&Movie], option: SortOption) {
    match option {
        SortOption::Alphabetical => movies.sort_by(|a, b| by_title(a, b)),
        SortOption::Year => movies.sort_by(|a, b| descending(a.year_number(), b.year_number())),
        SortOption::DateAdded => movies.sort_by(|a, b| by_date_added(a, b)),
    }
}

/// Newest additions that haven't been hidden from the home view
pub fn recent_additions(movies: &[Movie], limit: usize) -> Vec<&Movie> {
    let mut recent: Vec<&Movie> = movies.iter().filter(|m| !m.is_hidden_from_recent()).collect();
    recent.sort_by(|a, b| by_date_added(a, b));
    recent.truncate(limit);
    recent
}

/// Case-insensitive title substring search; a blank query matches nothing
pub fn search_by_title<'a>(movies: &'a [Movie], query: &str) -> Vec<&'a Movie> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn by_status(movies: &[Movie], status: WatchStatus) -> Vec<&Movie> {
    movies.iter().filter(|m| m.status() == status).collect()
}

pub fn favorites(movies: &[Movie], sort: FavoriteSort) -> Vec<&Movie> {
    let mut favorites: Vec<&Movie> = movies.iter().filter(|m| m.is_favorite()).collect();
    match sort {
        FavoriteSort::Rating => favorites.sort_by(|a, b| {
            let a = a.rating.unwrap_or(0.0);
            let b = b.rating.unwrap_or(0.0);
            b.total_cmp(&a)
        }),
        FavoriteSort::Title => favorites.sort_by(|a, b| by_title(a, b)),
    }
    favorites
}
