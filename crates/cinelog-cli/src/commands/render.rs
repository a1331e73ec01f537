use crate::output::Output;
use cinelog_core::{Outcome, StoreResult};
use cinelog_models::Movie;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;

fn styled_table(header: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table.set_header(header);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

pub fn format_rating(rating: Option<f64>) -> String {
    rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string())
}

pub fn movie_table(movies: &[&Movie]) -> Table {
    let mut table = styled_table(vec![
        bold("ID"),
        bold("Title"),
        bold("Year"),
        bold("Genres"),
        bold("Status"),
        bold("Fav"),
        bold("Rating"),
    ]);

    for movie in movies {
        let status = if movie.watched {
            Cell::new(movie.status().label()).fg(Color::Green)
        } else {
            Cell::new(movie.status().label()).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&movie.id),
            Cell::new(&movie.title),
            Cell::new(&movie.year),
            Cell::new(movie.genres.join(", ")),
            status,
            Cell::new(if movie.is_favorite() { "★" } else { "" }),
            Cell::new(format_rating(movie.rating)),
        ]);
    }
    table
}

/// Print a list of movies as a table, or as a JSON array in JSON mode
pub fn print_movies(heading: &str, movies: &[&Movie], output: &Output) {
    if !output.wants_tables() {
        output.movies(heading, movies);
        return;
    }

    println!("\n{}", heading.bright_cyan().bold());
    if movies.is_empty() {
        println!("{}", "No movies".bright_black());
        return;
    }
    println!("{}", movie_table(movies));
}

/// Print one movie with all its details
pub fn print_movie(movie: &Movie, output: &Output) {
    if !output.wants_tables() {
        output.movie(movie);
        return;
    }

    let mut table = styled_table(vec![
        Cell::new(&movie.title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(&movie.year),
    ]);
    table.add_row(vec![Cell::new("ID"), Cell::new(&movie.id)]);
    table.add_row(vec![Cell::new("Genres"), Cell::new(movie.genres.join(", "))]);
    table.add_row(vec![Cell::new("Status"), Cell::new(movie.status().label())]);
    table.add_row(vec![
        Cell::new("Favorite"),
        Cell::new(if movie.is_favorite() { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    table.add_row(vec![Cell::new("Rating"), Cell::new(format_rating(movie.rating))]);
    table.add_row(vec![Cell::new("Added"), Cell::new(&movie.date_added)]);
    if let Some(watched) = &movie.date_watched {
        table.add_row(vec![Cell::new("Watched"), Cell::new(watched)]);
    }
    if let Some(review) = &movie.review {
        table.add_row(vec![Cell::new("Review"), Cell::new(review)]);
    }
    if let Some(notes) = &movie.notes {
        table.add_row(vec![Cell::new("Notes"), Cell::new(notes)]);
    }
    println!("{}", table);
}

/// Turn a store result into user feedback.
///
/// A failed durable write still leaves the change in memory for this run
/// only, so it is reported as an error rather than a success.
pub fn report_write(result: StoreResult<Outcome>, id: &str, done: &str, output: &Output) -> Result<()> {
    match result {
        Ok(Outcome::Applied) => {
            output.success(done);
            Ok(())
        }
        Ok(Outcome::NotFound) => {
            output.warn(format!("No movie with id '{}'", id));
            Ok(())
        }
        Err(e) if e.is_persistence_failure() => {
            output.error(format!("{}, but the change could not be saved", done));
            Err(color_eyre::eyre::eyre!("Failed to save movies: {}", e))
        }
        Err(e) => Err(color_eyre::eyre::eyre!("{}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use cinelog_core::{KeyValueStore, KvError, MemoryKeyValueStore, MovieStore};
    use std::sync::Arc;

    /// Reads succeed with nothing stored; every write fails
    struct ReadOnlyDisk;

    #[async_trait]
    impl KeyValueStore for ReadOnlyDisk {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, KvError> {
            Ok(None)
        }

        async fn set_item(&self, key: &str, _value: &str) -> Result<(), KvError> {
            Err(KvError::Io {
                key: key.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        async fn remove_item(&self, key: &str) -> Result<(), KvError> {
            self.set_item(key, "").await
        }
    }

    fn dune() -> Movie {
        Movie::new(
            "1",
            "Dune",
            "2021",
            vec!["Sci-Fi".to_string()],
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn quiet_output() -> Output {
        Output::new(OutputFormat::Json, true)
    }

    #[test]
    fn test_format_rating() {
        assert_eq!(format_rating(Some(7.0)), "7.0");
        assert_eq!(format_rating(Some(8.26)), "8.3");
        assert_eq!(format_rating(None), "-");
    }

    #[tokio::test]
    async fn test_report_write_unsaved_change_is_an_error() {
        let store = MovieStore::new(Arc::new(ReadOnlyDisk));
        let result = store.add(dune()).await.map(|_| Outcome::Applied);

        let err = report_write(result, "1", "Added 'Dune'", &quiet_output()).unwrap_err();
        assert!(err.to_string().contains("Failed to save movies"));
        assert!(store.contains("1"));
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_report_write_unknown_id_is_not_an_error() {
        let store = MovieStore::new(Arc::new(MemoryKeyValueStore::new()));
        let result = store.update(dune()).await;
        assert!(matches!(result, Ok(Outcome::NotFound)));

        assert!(report_write(result, "1", "Updated 'Dune'", &quiet_output()).is_ok());
    }

    #[tokio::test]
    async fn test_report_write_rejected_record_is_an_error() {
        let store = MovieStore::new(Arc::new(MemoryKeyValueStore::new()));
        let mut untitled = dune();
        untitled.title = String::new();
        let result = store.add(untitled).await.map(|_| Outcome::Applied);

        let err = report_write(result, "1", "Added ''", &quiet_output()).unwrap_err();
        assert!(err.to_string().contains("title must not be empty"));
        assert!(!err.to_string().contains("Failed to save"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_report_write_applied() {
        let store = MovieStore::new(Arc::new(MemoryKeyValueStore::new()));
        let result = store.add(dune()).await.map(|_| Outcome::Applied);
        assert!(report_write(result, "1", "Added 'Dune'", &quiet_output()).is_ok());
    }
}
