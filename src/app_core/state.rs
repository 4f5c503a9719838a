//! Application state, types, and state-mutation methods.
//!
//! The dropdown never inspects rendered output to decide what is visible:
//! `matched_indices` is the single visibility predicate, recomputed on every
//! query edit, and both navigation and rendering read it.

use crate::model::Movie;
use crate::poster::Gallery;
use crate::suggest;
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tui_scrollview::ScrollViewState;

/// Which region currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The search input.
    Input,
    /// A suggestion in the open dropdown.
    Dropdown,
    /// The details pane for the committed selection.
    Details,
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// The full catalog, in display order.
    pub movies: Vec<Movie>,
    /// Lowercased title → movie index for O(1) exact-commit lookups.
    pub title_index: foldhash::HashMap<String, usize>,
    /// Indices into `movies` that match the current query.
    pub matched_indices: Vec<usize>,
    /// Whether the suggestion dropdown is shown. Recomputed on every filter
    /// pass; commits and outside clicks only ever clear it.
    pub dropdown_open: bool,
    /// Highlight state for the dropdown list, managed by ratatui.
    pub dropdown_state: ListState,
    /// Search input text.
    pub query: String,
    /// Cursor position in the query, in chars.
    pub query_cursor: usize,
    /// Which region has keyboard focus.
    pub focus: Focus,
    /// Committed selection shown in the details pane.
    pub selected_movie: Option<usize>,
    /// Poster slots, one per movie.
    pub posters: Gallery,
    /// Theme configuration.
    pub theme: ThemeConfig,
    /// Catalog name for the status bar.
    pub catalog_name: String,
    /// App version string.
    pub app_version: String,
    /// State for scrolling the details pane.
    pub details_scroll_state: ScrollViewState,
    /// Screen region of the search input (including borders), set during render.
    pub input_area: Option<Rect>,
    /// Screen region of the input text (inside borders).
    pub input_text_area: Option<Rect>,
    /// Screen region of the dropdown overlay (including borders).
    pub dropdown_area: Option<Rect>,
    /// Screen region of dropdown rows (inside borders).
    pub dropdown_content_area: Option<Rect>,
    /// Screen region of the details pane.
    pub details_area: Option<Rect>,
    /// Flag to quit app.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        movies: Vec<Movie>,
        posters: Gallery,
        theme: ThemeConfig,
        catalog_name: String,
        app_version: String,
    ) -> Self {
        let matched_indices: Vec<usize> = (0..movies.len()).collect();
        let title_index = movies
            .iter()
            .enumerate()
            .map(|(idx, movie)| (movie.title_lower.clone(), idx))
            .collect();

        Self {
            movies,
            title_index,
            matched_indices,
            dropdown_open: false,
            dropdown_state: ListState::default(),
            query: String::new(),
            query_cursor: 0,
            focus: Focus::Input,
            selected_movie: None,
            posters,
            theme,
            catalog_name,
            app_version,
            details_scroll_state: ScrollViewState::default(),
            input_area: None,
            input_text_area: None,
            dropdown_area: None,
            dropdown_content_area: None,
            details_area: None,
            should_quit: false,
        }
    }

    // -----------------------------------------------------------------------
    // Query editing. Every edit is followed by `update_matches` in the reducer.
    // -----------------------------------------------------------------------

    pub fn query_add_char(&mut self, c: char) {
        let byte_idx = self
            .query
            .char_indices()
            .nth(self.query_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.query.len());
        self.query.insert(byte_idx, c);
        self.query_cursor += 1;
    }

    pub fn query_backspace(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
            if let Some((byte_idx, _)) = self.query.char_indices().nth(self.query_cursor) {
                self.query.remove(byte_idx);
            }
        }
    }

    pub fn query_delete(&mut self) {
        let char_count = self.query.chars().count();
        if self.query_cursor < char_count
            && let Some((byte_idx, _)) = self.query.char_indices().nth(self.query_cursor)
        {
            self.query.remove(byte_idx);
        }
    }

    pub fn query_move_cursor_left(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
        }
    }

    pub fn query_move_cursor_right(&mut self) {
        let char_count = self.query.chars().count();
        if self.query_cursor < char_count {
            self.query_cursor += 1;
        }
    }

    pub fn query_move_to_start(&mut self) {
        self.query_cursor = 0;
    }

    pub fn query_move_to_end(&mut self) {
        self.query_cursor = self.query.chars().count();
    }

    pub fn query_clear(&mut self) {
        self.query.clear();
        self.query_cursor = 0;
    }

    pub fn query_delete_word(&mut self) {
        if self.query_cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.query.chars().collect();
        let mut i = self.query_cursor;

        // Skip trailing whitespace
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }

        // Skip non-whitespace (the word)
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }

        let new_cursor = i;
        let byte_start = self
            .query
            .char_indices()
            .nth(new_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let byte_end = self
            .query
            .char_indices()
            .nth(self.query_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.query.len());

        self.query.replace_range(byte_start..byte_end, "");
        self.query_cursor = new_cursor;
    }

    // -----------------------------------------------------------------------
    // Filter pass and dropdown focus walk
    // -----------------------------------------------------------------------

    /// Recomputes the match set and dropdown visibility for the current query.
    pub fn update_matches(&mut self) {
        self.matched_indices = suggest::find_matches(&self.query, &self.movies);
        self.dropdown_open = suggest::dropdown_visible(&self.query, &self.matched_indices);
        self.dropdown_state.select(None);
        if self.focus == Focus::Dropdown {
            self.focus = Focus::Input;
        }
    }

    /// Down-arrow from the input: focus the first visible suggestion.
    /// No-op while the dropdown is closed.
    pub fn focus_first_suggestion(&mut self) {
        if self.dropdown_open && !self.matched_indices.is_empty() {
            self.focus = Focus::Dropdown;
            self.dropdown_state.select(Some(0));
        }
    }

    /// Moves the dropdown highlight down, clamped at the last visible item.
    pub fn dropdown_next(&mut self) {
        if let Some(selected) = self.dropdown_state.selected()
            && selected + 1 < self.matched_indices.len()
        {
            self.dropdown_state.select(Some(selected + 1));
        }
    }

    /// Moves the dropdown highlight up; from the first item, focus returns to
    /// the input.
    pub fn dropdown_prev(&mut self) {
        match self.dropdown_state.selected() {
            Some(0) | None => self.focus_input(),
            Some(selected) => self.dropdown_state.select(Some(selected - 1)),
        }
    }

    pub fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.dropdown_state.select(None);
    }

    /// Hides the dropdown without touching the query (outside click, Esc).
    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
        self.dropdown_state.select(None);
        if self.focus == Focus::Dropdown {
            self.focus = Focus::Input;
        }
    }

    // -----------------------------------------------------------------------
    // Selection commit
    // -----------------------------------------------------------------------

    /// Commits a movie: copies its title into the input, closes the dropdown,
    /// and shows it in the details pane. The filter is NOT re-run; the next
    /// edit recomputes matches as usual.
    pub fn commit(&mut self, movie_idx: usize) {
        let Some(movie) = self.movies.get(movie_idx) else {
            return;
        };
        self.query = movie.title.clone();
        self.query_cursor = self.query.chars().count();
        self.dropdown_open = false;
        self.dropdown_state.select(None);
        self.focus = Focus::Input;
        self.selected_movie = Some(movie_idx);
        self.details_scroll_state = ScrollViewState::default();
    }

    /// Commits the currently highlighted suggestion, if any.
    pub fn commit_selection(&mut self) {
        if let Some(selected) = self.dropdown_state.selected()
            && let Some(&movie_idx) = self.matched_indices.get(selected)
        {
            self.commit(movie_idx);
        }
    }

    /// Enter in the input: closes the dropdown and commits the movie whose
    /// title equals the query, case-insensitively, when there is one.
    pub fn commit_exact(&mut self) {
        let key = self.query.trim().to_lowercase();
        if let Some(&movie_idx) = self.title_index.get(&key) {
            self.commit(movie_idx);
        } else {
            self.close_dropdown();
        }
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.selected_movie.and_then(|idx| self.movies.get(idx))
    }

    // -----------------------------------------------------------------------
    // Details scrolling
    // -----------------------------------------------------------------------

    pub fn scroll_details_up(&mut self) {
        self.details_scroll_state.scroll_up();
    }

    pub fn scroll_details_down(&mut self) {
        self.details_scroll_state.scroll_down();
    }

    pub fn scroll_details_by_lines(&mut self, lines: u16, down: bool) {
        for _ in 0..lines {
            if down {
                self.scroll_details_down();
            } else {
                self.scroll_details_up();
            }
        }
    }
}
