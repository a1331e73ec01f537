use super::render::{print_movie, print_movies, report_write};
use crate::context::AppContext;
use crate::output::Output;
use crate::StatusFilter;
use chrono::Utc;
use cinelog_core::{query, FavoriteSort, Outcome, SortOption, RECENT_LIMIT};
use cinelog_models::{is_known_genre, parse_rating, Movie, WatchStatus};
use color_eyre::Result;

fn find_movie(ctx: &AppContext, id: &str) -> Result<Movie> {
    ctx.store
        .get(id)
        .ok_or_else(|| color_eyre::eyre::eyre!("No movie with id '{}'", id))
}

/// Canonicalize catalog genres, dropping blanks and repeats.
/// Returns the genres to store and the ones missing from the catalog.
fn normalize_genres(genres: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut normalized: Vec<String> = Vec::new();
    let mut unknown = Vec::new();
    for genre in genres {
        let genre = genre.trim();
        if genre.is_empty() {
            continue;
        }
        let (genre, known) = match is_known_genre(genre) {
            Some(canonical) => (canonical.to_string(), true),
            None => (genre.to_string(), false),
        };
        if normalized.contains(&genre) {
            continue;
        }
        if !known {
            unknown.push(genre.clone());
        }
        normalized.push(genre);
    }
    (normalized, unknown)
}

fn genres_from_args(genres: Vec<String>, output: &Output) -> Vec<String> {
    let (genres, unknown) = normalize_genres(genres);
    for genre in unknown {
        output.warn(format!("'{}' is not a known genre, keeping it anyway", genre));
    }
    genres
}

pub fn list(ctx: &AppContext, status: StatusFilter, sort: SortOption, output: &Output) -> Result<()> {
    let movies = ctx.store.all();
    let (heading, mut view) = match status {
        StatusFilter::Pending => ("Pending", query::by_status(&movies, WatchStatus::Pending)),
        StatusFilter::Watched => ("Watched", query::by_status(&movies, WatchStatus::Watched)),
        StatusFilter::All => ("All movies", movies.iter().collect()),
    };
    query::sort_movies(&mut view, sort);
    print_movies(heading, &view, output);
    Ok(())
}

pub async fn add(ctx: &AppContext, title: String, year: String, genres: Vec<String>, output: &Output) -> Result<()> {
    let genres = genres_from_args(genres, output);
    let title = title.trim().to_string();
    let year = year.trim().to_string();
    Movie::validate_details(&title, &year, &genres).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let now = Utc::now();
    let movie = Movie::new(ctx.store.next_id(now), title, year, genres, now);
    let id = movie.id.clone();
    let done = format!("Added '{}' ({})", movie.title, id);

    let result = ctx.store.add(movie).await.map(|_| Outcome::Applied);
    report_write(result, &id, &done, output)
}

pub async fn edit(
    ctx: &AppContext,
    id: &str,
    title: Option<String>,
    year: Option<String>,
    genres: Vec<String>,
    output: &Output,
) -> Result<()> {
    let movie = find_movie(ctx, id)?;
    let title = title.map(|t| t.trim().to_string()).unwrap_or_else(|| movie.title.clone());
    let year = year.map(|y| y.trim().to_string()).unwrap_or_else(|| movie.year.clone());
    let genres = if genres.is_empty() {
        movie.genres.clone()
    } else {
        genres_from_args(genres, output)
    };

    let edited = movie
        .edited(title, year, genres)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let done = format!("Updated '{}'", edited.title);
    report_write(ctx.store.update(edited).await, id, &done, output)
}

pub async fn toggle_watched(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let movie = find_movie(ctx, id)?.toggled_watched(Utc::now());
    let done = if movie.watched {
        format!("Marked '{}' as watched", movie.title)
    } else {
        format!("Moved '{}' back to pending", movie.title)
    };
    report_write(ctx.store.update(movie).await, id, &done, output)
}

pub async fn toggle_favorite(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let movie = find_movie(ctx, id)?.toggled_favorite();
    let done = if movie.is_favorite() {
        format!("Added '{}' to favorites", movie.title)
    } else {
        format!("Removed '{}' from favorites", movie.title)
    };
    report_write(ctx.store.update(movie).await, id, &done, output)
}

pub async fn rate(
    ctx: &AppContext,
    id: &str,
    rating: Option<String>,
    review: Option<String>,
    output: &Output,
) -> Result<()> {
    if rating.is_none() && review.is_none() {
        return Err(color_eyre::eyre::eyre!("Provide a rating, a --review, or both"));
    }
    let rating = rating
        .as_deref()
        .map(parse_rating)
        .transpose()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let movie = find_movie(ctx, id)?
        .rated(rating, review)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let done = format!(
        "Rated '{}' {}",
        movie.title,
        super::render::format_rating(movie.rating)
    );
    let result = ctx.store.update(movie.clone()).await;
    report_write(result, id, &done, output)?;
    print_movie(&movie, output);
    Ok(())
}

pub async fn note(ctx: &AppContext, id: &str, text: String, output: &Output) -> Result<()> {
    let text = text.trim().to_string();
    let notes = if text.is_empty() { None } else { Some(text) };
    let movie = find_movie(ctx, id)?.with_notes(notes);
    let done = format!("Saved notes for '{}'", movie.title);
    report_write(ctx.store.update(movie).await, id, &done, output)
}

pub async fn hide(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let movie = find_movie(ctx, id)?.hidden_from_recent();
    let done = format!("Hid '{}' from recent additions", movie.title);
    report_write(ctx.store.update(movie).await, id, &done, output)
}

pub async fn delete(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let done = match ctx.store.get(id) {
        Some(movie) => format!("Deleted '{}'", movie.title),
        None => format!("Deleted {}", id),
    };
    report_write(ctx.store.delete(id).await, id, &done, output)
}

pub fn recent(ctx: &AppContext, output: &Output) -> Result<()> {
    let movies = ctx.store.all();
    let recent = query::recent_additions(&movies, RECENT_LIMIT);
    print_movies("Recent Additions", &recent, output);
    Ok(())
}

pub fn search(ctx: &AppContext, query_text: &str, output: &Output) -> Result<()> {
    if query_text.trim().is_empty() {
        return Err(color_eyre::eyre::eyre!("Search query must not be empty"));
    }
    let movies = ctx.store.all();
    let results = query::search_by_title(&movies, query_text);
    print_movies("Search Results", &results, output);
    Ok(())
}

pub fn favorites(ctx: &AppContext, sort: FavoriteSort, output: &Output) -> Result<()> {
    let movies = ctx.store.all();
    let favorites = query::favorites(&movies, sort);
    print_movies("Favorites", &favorites, output);
    Ok(())
}
