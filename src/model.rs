//! Catalog data model: raw records as stored on disk and resolved movies.

use serde::Deserialize;

/// The root structure of the catalog JSON file.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Human-readable catalog name shown in the status bar.
    #[serde(default)]
    pub name: String,
    /// The catalog entries.
    pub movies: Vec<MovieRecord>,
}

/// A raw catalog entry as stored in the JSON file.
///
/// Field names follow the MovieLens export this catalog is converted from:
/// `title` carries a trailing `(YYYY)` year and `genres` is pipe-separated.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub genres: String,
    /// Primary poster source, relative to the posters root.
    #[serde(default)]
    pub poster: Option<String>,
    /// Substitute source used once if the primary fails to load.
    #[serde(default)]
    pub poster_fallback: Option<String>,
}

/// A catalog entry with resolved display fields.
#[derive(Debug, Clone)]
pub struct Movie {
    pub id: u64,
    /// Full title as stored in the catalog. This is both the suggestion label
    /// and the value copied into the search input on selection.
    pub title: String,
    /// Title lowercased once so the per-keystroke filter pass never allocates.
    pub title_lower: String,
    pub genres: Vec<String>,
    /// Release year parsed from the trailing `(YYYY)` in the title, if any.
    pub year: Option<u16>,
    pub poster: Option<String>,
    pub poster_fallback: Option<String>,
}

impl Movie {
    /// Resolves a raw record: parses the year suffix and splits the genre list.
    pub fn from_record(record: MovieRecord) -> Self {
        let year = parse_year(&record.title);
        let genres = record
            .genres
            .split('|')
            .map(str::trim)
            .filter(|g| !g.is_empty() && *g != "(no genres listed)")
            .map(str::to_string)
            .collect();
        let title_lower = record.title.to_lowercase();
        Self {
            id: record.id,
            title: record.title,
            title_lower,
            genres,
            year,
            poster: record.poster,
            poster_fallback: record.poster_fallback,
        }
    }
}

/// Extracts a 4-digit year from a MovieLens-style `Title (YYYY)` suffix.
fn parse_year(title: &str) -> Option<u16> {
    let trimmed = title.trim_end();
    let open = trimmed.rfind('(')?;
    let inner = trimmed[open + 1..].strip_suffix(')')?;
    if inner.len() == 4 && inner.chars().all(|c| c.is_ascii_digit()) {
        inner.parse().ok()
    } else {
        None
    }
}
