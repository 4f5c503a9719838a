//! Catalog loading from disk.

use anyhow::Result;
use std::fs;
use std::io;

use crate::model::{Catalog, Movie};

/// Reads and parses a catalog JSON file.
pub fn load_catalog(file_path: &str) -> Result<Catalog> {
    if !std::path::Path::new(file_path).exists() {
        if file_path == "movies.json" {
            anyhow::bail!(
                "Default 'movies.json' not found in current directory. Use --file to specify a catalog."
            );
        } else {
            anyhow::bail!("File not found: {}", file_path);
        }
    }
    let file = fs::File::open(file_path)?;
    let reader = io::BufReader::new(file);
    let catalog: Catalog = serde_json::from_reader(reader)?;
    Ok(catalog)
}

/// Resolves catalog records into movies, sorted by (lowercased title, id) so
/// the suggestion list order is deterministic.
pub fn build_movies(catalog: Catalog) -> Vec<Movie> {
    let mut movies: Vec<Movie> = catalog.movies.into_iter().map(Movie::from_record).collect();
    movies.sort_by(|a, b| {
        a.title_lower
            .cmp(&b.title_lower)
            .then_with(|| a.id.cmp(&b.id))
    });
    movies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog("/nonexistent/movies.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_load_catalog_roundtrip() {
        let dir = std::env::temp_dir().join("flick_tui_data_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        fs::File::create(&path)
            .unwrap()
            .write_all(
                br#"{"name": "tiny", "movies": [
                    {"id": 2, "title": "Jumanji (1995)", "genres": "Adventure|Children"},
                    {"id": 1, "title": "Toy Story (1995)", "genres": "Animation"}
                ]}"#,
            )
            .unwrap();

        let catalog = load_catalog(path.to_str().unwrap()).unwrap();
        assert_eq!(catalog.name, "tiny");

        let movies = build_movies(catalog);
        assert_eq!(movies.len(), 2);
        // Sorted by title, not file order.
        assert_eq!(movies[0].title, "Jumanji (1995)");
        assert_eq!(movies[1].title, "Toy Story (1995)");
        assert_eq!(movies[1].year, Some(1995));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_build_movies_sort_ties_on_id() {
        let catalog: Catalog = serde_json::from_str(
            r#"{"movies": [
                {"id": 9, "title": "Solaris (1972)"},
                {"id": 4, "title": "Solaris (1972)"}
            ]}"#,
        )
        .unwrap();
        let movies = build_movies(catalog);
        assert_eq!(movies[0].id, 4);
        assert_eq!(movies[1].id, 9);
    }
}
