/// Genres offered when adding a movie. Stored records may carry others.
pub const GENRES: [&str; 10] = [
    "Romance", "Action", "Comedy", "Horror", "Drama", "Sci-Fi", "Thriller", "Fantasy", "Mystery", "Musical",
];

/// Case-insensitive lookup against the catalog, returning its canonical spelling
pub fn is_known_genre(name: &str) -> Option<&'static str> {
    let name = name.trim();
    GENRES.iter().copied().find(|g| g.eq_ignore_ascii_case(name))
}
