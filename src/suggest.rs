//! Suggestion filtering for the search input.
//!
//! Pure functions over the catalog; rendering and focus handling live in
//! `app_core`. A movie matches when its title contains the query as a
//! case-insensitive substring, and the dropdown is visible only while the
//! query is non-empty and at least one movie matched.

use crate::model::Movie;

/// Returns the indices of movies whose title contains `query`,
/// case-insensitively. An empty query matches every movie.
pub fn find_matches(query: &str, movies: &[Movie]) -> Vec<usize> {
    if query.is_empty() {
        return (0..movies.len()).collect();
    }

    let query_lower = query.to_lowercase();
    movies
        .iter()
        .enumerate()
        .filter(|(_, movie)| movie.title_lower.contains(&query_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Dropdown visibility rule: open iff the query is non-empty and the
/// match set is non-empty.
pub fn dropdown_visible(query: &str, matches: &[usize]) -> bool {
    !query.is_empty() && !matches.is_empty()
}
