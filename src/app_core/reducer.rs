//! Event reducer: handlers for key and mouse events.
//!
//! The binary calls these after converting crossterm events to
//! [`AppKeyEvent`] / [`AppMouseEvent`].

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, Focus};
use crate::ui;

pub const SCROLL_LINES: u16 = 1;

/// Returns the region that contains the given cell coordinates, if any.
///
/// The dropdown overlay is checked first: while open it sits on top of the
/// details pane, and a click there must select a suggestion rather than focus
/// what is underneath.
pub fn region_at(app: &AppState, column: u16, row: u16) -> Option<Focus> {
    if app.dropdown_open
        && let Some(area) = app.dropdown_area
        && area.contains((column, row).into())
    {
        return Some(Focus::Dropdown);
    }
    if let Some(area) = app.input_area
        && area.contains((column, row).into())
    {
        return Some(Focus::Input);
    }
    if let Some(area) = app.details_area
        && area.contains((column, row).into())
    {
        return Some(Focus::Details);
    }
    None
}

/// Handle a key event, mutating `app` in place.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    fn apply_query_edit(app: &mut AppState, edit: impl FnOnce(&mut AppState)) {
        edit(app);
        app.update_matches();
    }

    if event.is_release {
        return;
    }

    let code = event.code;
    let ctrl = event.ctrl;

    if ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if code == AppKeyCode::Tab || code == AppKeyCode::BackTab {
        // Two stops: the search input and the details pane. Entering the
        // details pane closes the dropdown like any other focus loss.
        match app.focus {
            Focus::Input | Focus::Dropdown => {
                if app.selected_movie.is_some() {
                    app.close_dropdown();
                    app.focus = Focus::Details;
                }
            }
            Focus::Details => app.focus_input(),
        }
        return;
    }

    match app.focus {
        Focus::Input => match code {
            AppKeyCode::Esc => {
                if app.dropdown_open {
                    app.close_dropdown();
                } else {
                    app.should_quit = true;
                }
            }
            AppKeyCode::Enter => app.commit_exact(),
            AppKeyCode::Down => app.focus_first_suggestion(),
            AppKeyCode::Char('u') if ctrl => apply_query_edit(app, AppState::query_clear),
            AppKeyCode::Char('w') if ctrl => apply_query_edit(app, AppState::query_delete_word),
            AppKeyCode::Char('a') if ctrl => app.query_move_to_start(),
            AppKeyCode::Char('e') if ctrl => app.query_move_to_end(),
            AppKeyCode::Char(c) if !ctrl => apply_query_edit(app, |app| app.query_add_char(c)),
            AppKeyCode::Backspace => apply_query_edit(app, AppState::query_backspace),
            AppKeyCode::Delete => apply_query_edit(app, AppState::query_delete),
            AppKeyCode::Left => app.query_move_cursor_left(),
            AppKeyCode::Right => app.query_move_cursor_right(),
            AppKeyCode::Home => app.query_move_to_start(),
            AppKeyCode::End => app.query_move_to_end(),
            _ => {}
        },
        Focus::Dropdown => match code {
            AppKeyCode::Down => app.dropdown_next(),
            AppKeyCode::Up => app.dropdown_prev(),
            AppKeyCode::Enter => app.commit_selection(),
            AppKeyCode::Esc => app.close_dropdown(),
            AppKeyCode::Char(c) if !ctrl => {
                // Typing resumes editing in the input.
                app.focus_input();
                apply_query_edit(app, |app| app.query_add_char(c));
            }
            AppKeyCode::Backspace => {
                app.focus_input();
                apply_query_edit(app, AppState::query_backspace);
            }
            _ => {}
        },
        Focus::Details => match code {
            AppKeyCode::Up => app.scroll_details_up(),
            AppKeyCode::Down => app.scroll_details_down(),
            AppKeyCode::PageUp => app.details_scroll_state.scroll_page_up(),
            AppKeyCode::PageDown => app.details_scroll_state.scroll_page_down(),
            AppKeyCode::Home => {
                app.details_scroll_state = tui_scrollview::ScrollViewState::default()
            }
            AppKeyCode::End => app.details_scroll_state.scroll_to_bottom(),
            AppKeyCode::Esc => app.focus_input(),
            AppKeyCode::Char(c) if c.is_alphanumeric() && !ctrl && !event.alt => {
                app.focus_input();
                app.query_move_to_end();
                apply_query_edit(app, |app| app.query_add_char(c));
            }
            _ => {}
        },
    }
}

/// Handle a mouse event. Coordinates must already be in terminal cells.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let column = event.column;
    let row = event.row;
    let region = region_at(app, column, row);
    let mut transitioned = false;

    if matches!(event.kind, AppMouseKind::ScrollUp | AppMouseKind::ScrollDown) {
        if region == Some(Focus::Details) {
            app.scroll_details_by_lines(SCROLL_LINES, event.kind == AppMouseKind::ScrollDown);
            transitioned = true;
        }
        return transitioned;
    }

    if event.kind == AppMouseKind::LeftDown {
        match region {
            Some(Focus::Dropdown) => {
                if let Some(content_area) = app.dropdown_content_area
                    && content_area.contains((column, row).into())
                    && !app.matched_indices.is_empty()
                {
                    let list_row = row.saturating_sub(content_area.y) as usize;
                    let clicked = app.dropdown_state.offset() + list_row;
                    if let Some(&movie_idx) = app.matched_indices.get(clicked) {
                        app.commit(movie_idx);
                        transitioned = true;
                    }
                }
            }
            Some(Focus::Input) => {
                if app.focus != Focus::Input {
                    app.focus_input();
                    transitioned = true;
                }
                if let Some(text_area) = app.input_text_area
                    && text_area.contains((column, row).into())
                {
                    let horizontal_scroll = ui::query_horizontal_scroll(
                        &app.query,
                        app.query_cursor,
                        text_area.width,
                    );
                    let local_x = column.saturating_sub(text_area.x);
                    let target_column = horizontal_scroll + local_x;
                    let new_cursor = ui::query_cursor_for_column(&app.query, target_column);
                    if new_cursor != app.query_cursor {
                        app.query_cursor = new_cursor;
                        transitioned = true;
                    }
                }
            }
            Some(Focus::Details) => {
                // A click outside both the input and the dropdown closes it.
                if app.dropdown_open {
                    app.close_dropdown();
                    transitioned = true;
                }
                if app.selected_movie.is_some() && app.focus != Focus::Details {
                    app.focus = Focus::Details;
                    transitioned = true;
                }
            }
            None => {
                if app.dropdown_open {
                    app.close_dropdown();
                    transitioned = true;
                }
            }
        }
    }

    transitioned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
    use crate::app_core::state::{AppState, Focus};
    use crate::model::{Movie, MovieRecord};
    use crate::poster::Gallery;
    use crate::theme;
    use ratatui::layout::Rect;

    fn make_key(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent::new(code)
    }

    fn make_key_ctrl(code: AppKeyCode) -> AppKeyEvent {
        AppKeyEvent {
            code,
            ctrl: true,
            alt: false,
            is_release: false,
        }
    }

    fn make_mouse(kind: AppMouseKind, column: u16, row: u16) -> AppMouseEvent {
        AppMouseEvent { kind, column, row }
    }

    fn make_app(titles: &[&str]) -> AppState {
        let movies: Vec<Movie> = titles
            .iter()
            .enumerate()
            .map(|(idx, title)| {
                Movie::from_record(MovieRecord {
                    id: idx as u64 + 1,
                    title: title.to_string(),
                    genres: String::new(),
                    poster: None,
                    poster_fallback: None,
                })
            })
            .collect();
        AppState::new(
            movies,
            Gallery::empty(),
            theme::Theme::Dracula.config(),
            "test".to_string(),
            "v0".to_string(),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key_event(app, make_key(AppKeyCode::Char(c)));
        }
    }

    #[test]
    fn test_typing_filters_and_opens_dropdown() {
        let mut app = make_app(&["Batman", "Catwoman", "Superman"]);

        type_text(&mut app, "bat");
        assert_eq!(app.query, "bat");
        assert_eq!(app.matched_indices, vec![0]);
        assert!(app.dropdown_open);

        type_text(&mut app, "z");
        assert!(app.matched_indices.is_empty());
        assert!(!app.dropdown_open);
    }

    #[test]
    fn test_down_enters_dropdown_up_from_first_leaves_it() {
        let mut app = make_app(&["Batman", "Batman Returns"]);
        type_text(&mut app, "batman");

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.focus, Focus::Dropdown);
        assert_eq!(app.dropdown_state.selected(), Some(0));

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.dropdown_state.selected(), Some(1));

        handle_key_event(&mut app, make_key(AppKeyCode::Up));
        assert_eq!(app.dropdown_state.selected(), Some(0));

        handle_key_event(&mut app, make_key(AppKeyCode::Up));
        assert_eq!(app.focus, Focus::Input);
        assert!(app.dropdown_open, "leaving the dropdown does not close it");
    }

    #[test]
    fn test_down_is_noop_while_dropdown_closed() {
        let mut app = make_app(&["Batman"]);

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.focus, Focus::Input);

        type_text(&mut app, "zzz");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_enter_on_suggestion_commits() {
        let mut app = make_app(&["Batman (1989)", "Batman Returns (1992)"]);
        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        handle_key_event(&mut app, make_key(AppKeyCode::Down));

        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.query, "Batman Returns (1992)");
        assert!(!app.dropdown_open);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.selected_movie, Some(1));
    }

    #[test]
    fn test_typing_from_dropdown_resumes_editing() {
        let mut app = make_app(&["Batman", "Batmans"]);
        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.focus, Focus::Dropdown);

        handle_key_event(&mut app, make_key(AppKeyCode::Char('s')));
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.query, "batmans");
        assert_eq!(app.matched_indices, vec![1]);
    }

    #[test]
    fn test_esc_closes_dropdown_then_quits() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "bat");
        assert!(app.dropdown_open);

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(!app.dropdown_open);
        assert!(!app.should_quit);
        assert_eq!(app.query, "bat");

        handle_key_event(&mut app, make_key(AppKeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_enter_in_input_commits_exact_title() {
        let mut app = make_app(&["Heat (1995)", "Casino (1995)"]);
        type_text(&mut app, "heat (1995)");

        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.selected_movie, Some(0));
        assert!(!app.dropdown_open);
    }

    #[test]
    fn test_input_shortcuts() {
        let mut app = make_app(&[]);
        type_text(&mut app, "hello world");

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('a')));
        assert_eq!(app.query_cursor, 0);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('e')));
        assert_eq!(app.query_cursor, 11);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('w')));
        assert_eq!(app.query, "hello ");
        assert_eq!(app.query_cursor, 6);

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('u')));
        assert_eq!(app.query, "");
        assert_eq!(app.query_cursor, 0);
    }

    #[test]
    fn test_tab_cycles_input_and_details() {
        let mut app = make_app(&["Batman"]);

        // No committed selection: Tab stays in the input.
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);

        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        assert_eq!(app.selected_movie, Some(0));

        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        assert_eq!(app.focus, Focus::Details);

        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_typing_from_details_autofocuses_input() {
        let mut app = make_app(&["Batman", "Catwoman"]);
        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));
        assert_eq!(app.focus, Focus::Details);

        handle_key_event(&mut app, make_key(AppKeyCode::Char('s')));
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.query, "Batmans");
    }

    #[test]
    fn test_details_scrolling() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        handle_key_event(&mut app, make_key(AppKeyCode::Tab));

        handle_key_event(&mut app, make_key(AppKeyCode::Down));
        assert_eq!(app.details_scroll_state.offset().y, 1);

        handle_key_event(&mut app, make_key(AppKeyCode::Home));
        assert_eq!(app.details_scroll_state.offset().y, 0);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = make_app(&["Batman"]);
        let release = AppKeyEvent {
            code: AppKeyCode::Char('a'),
            ctrl: false,
            alt: false,
            is_release: true,
        };
        handle_key_event(&mut app, release);
        assert!(app.query.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "bat");
        handle_key_event(&mut app, make_key(AppKeyCode::Down));

        handle_key_event(&mut app, make_key_ctrl(AppKeyCode::Char('c')));
        assert!(app.should_quit);
    }

    // -----------------------------------------------------------------------
    // Mouse
    // -----------------------------------------------------------------------

    fn layout_areas(app: &mut AppState) {
        app.input_area = Some(Rect::new(0, 0, 60, 3));
        app.input_text_area = Some(Rect::new(1, 1, 58, 1));
        app.dropdown_area = Some(Rect::new(1, 3, 58, 6));
        app.dropdown_content_area = Some(Rect::new(2, 4, 56, 4));
        app.details_area = Some(Rect::new(0, 9, 60, 10));
    }

    #[test]
    fn test_click_on_suggestion_commits_it() {
        let mut app = make_app(&["Batman (1989)", "Batman Returns (1992)"]);
        type_text(&mut app, "batman");
        layout_areas(&mut app);

        // Second visible row.
        let transitioned = handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 5, 5));

        assert!(transitioned);
        assert_eq!(app.query, "Batman Returns (1992)");
        assert_eq!(app.selected_movie, Some(1));
        assert!(!app.dropdown_open);
    }

    #[test]
    fn test_click_outside_closes_dropdown() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "bat");
        layout_areas(&mut app);
        assert!(app.dropdown_open);

        let transitioned = handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 30, 15));

        assert!(transitioned);
        assert!(!app.dropdown_open);
        assert_eq!(app.query, "bat");
    }

    #[test]
    fn test_click_in_input_keeps_dropdown_open() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "bat");
        layout_areas(&mut app);

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 2, 1));
        assert!(app.dropdown_open);
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn test_click_in_input_sets_caret() {
        let mut app = make_app(&[]);
        type_text(&mut app, "abcdef");
        layout_areas(&mut app);

        let transitioned = handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 3, 1));

        assert!(transitioned);
        assert_eq!(app.query_cursor, 2);
    }

    #[test]
    fn test_click_in_input_past_end_clamps() {
        let mut app = make_app(&[]);
        type_text(&mut app, "abc");
        app.query_move_to_start();
        layout_areas(&mut app);

        handle_mouse_event(&mut app, make_mouse(AppMouseKind::LeftDown, 40, 1));
        assert_eq!(app.query_cursor, app.query.chars().count());
    }

    #[test]
    fn test_scroll_wheel_scrolls_details() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "batman");
        handle_key_event(&mut app, make_key(AppKeyCode::Enter));
        layout_areas(&mut app);

        let transitioned =
            handle_mouse_event(&mut app, make_mouse(AppMouseKind::ScrollDown, 30, 12));

        assert!(transitioned);
        assert_eq!(app.details_scroll_state.offset().y, SCROLL_LINES);
    }

    #[test]
    fn test_dropdown_overlay_wins_hit_test_over_details() {
        let mut app = make_app(&["Batman"]);
        type_text(&mut app, "bat");
        // Overlapping rects: the dropdown sits on top of the details pane.
        app.input_area = Some(Rect::new(0, 0, 60, 3));
        app.dropdown_area = Some(Rect::new(1, 3, 58, 6));
        app.dropdown_content_area = Some(Rect::new(2, 4, 56, 4));
        app.details_area = Some(Rect::new(0, 3, 60, 16));

        assert_eq!(region_at(&app, 5, 4), Some(Focus::Dropdown));

        app.close_dropdown();
        assert_eq!(region_at(&app, 5, 4), Some(Focus::Details));
    }
}
