use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect, Size},
    style::Modifier,
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState,
    },
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::UnicodeWidthChar;

use crate::app_core::state::{AppState, Focus};
use crate::poster::PosterStatus;

/// Upper bound on visible dropdown rows; longer match sets scroll.
const MAX_DROPDOWN_ROWS: usize = 8;

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input - fixed 3 lines
            Constraint::Min(0),    // Details pane - takes all space
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    app.input_area = Some(chunks[0]);
    app.details_area = Some(chunks[1]);

    render_search_input(f, app, chunks[0]);
    render_details(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    // Drawn last so the overlay sits on top of the details pane.
    if app.dropdown_open {
        render_dropdown(f, app, chunks[0], chunks[1]);
    } else {
        app.dropdown_area = None;
        app.dropdown_content_area = None;
    }
}

/// Renders the interactive search input box.
fn render_search_input(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focus == Focus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .title(" Search ")
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↓ suggestions • Tab details ").right_aligned()
        } else {
            Line::from("")
        });

    let inner = block.inner(area);
    app.input_text_area = Some(inner);
    let horizontal_scroll = query_horizontal_scroll(&app.query, app.query_cursor, inner.width);

    let content = if app.query.is_empty() {
        Text::from(Line::from(Span::styled(
            "Type a movie title…",
            app.theme.text.add_modifier(Modifier::DIM).italic(),
        )))
    } else {
        Text::from(app.query.as_str())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(app.theme.text)
        .scroll((0, horizontal_scroll));

    f.render_widget(paragraph, area);

    if is_focused && inner.width > 0 && inner.height > 0 {
        let cursor_offset = query_cursor_offset(&app.query, app.query_cursor);
        let max_x = inner.width.saturating_sub(1);
        let visible_cursor_offset = cursor_offset.saturating_sub(horizontal_scroll);
        let cursor_x = inner.x + visible_cursor_offset.min(max_x);
        f.set_cursor_position((cursor_x, inner.y));
    }
}

/// Renders the suggestion dropdown as an overlay directly under the input.
fn render_dropdown(f: &mut Frame, app: &mut AppState, input_area: Rect, below: Rect) {
    let rows = app.matched_indices.len().min(MAX_DROPDOWN_ROWS) as u16;
    let height = (rows + 2).min(below.height);
    let width = input_area.width.saturating_sub(2);
    if height < 3 || width < 3 {
        app.dropdown_area = None;
        app.dropdown_content_area = None;
        return;
    }

    let area = Rect::new(input_area.x + 1, below.y, width, height);
    f.render_widget(Clear, area);

    let is_focused = app.focus == Focus::Dropdown;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.list_normal)
        .title(format!(" Suggestions ({}) ", app.matched_indices.len()))
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ move • Enter select ").right_aligned()
        } else {
            Line::from("")
        });

    let inner = block.inner(area);
    app.dropdown_area = Some(area);
    app.dropdown_content_area = Some(inner);

    let items: Vec<ListItem> = app
        .matched_indices
        .iter()
        .map(|&idx| ListItem::new(app.movies[idx].title.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(app.theme.list_normal)
        .scroll_padding(1)
        .highlight_style(app.theme.list_selected);

    f.render_stateful_widget(list, area, &mut app.dropdown_state);

    if app.matched_indices.len() > inner.height as usize {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        let mut scrollbar_state = ScrollbarState::new(app.matched_indices.len())
            .position(app.dropdown_state.selected().unwrap_or(0));
        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Renders the details pane for the committed selection.
fn render_details(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focus == Focus::Details;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.text)
        .title(" Movie ")
        .title_alignment(Alignment::Left)
        .title_style(app.theme.title)
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ scroll • Tab back ").right_aligned()
        } else {
            Line::from("")
        });

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    if inner_area.width == 0 || inner_area.height == 0 {
        return;
    }

    if app.selected_movie.is_none() {
        let hint = Paragraph::new("Type to search, then Enter or click a suggestion.")
            .style(app.theme.text.add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
        f.render_widget(hint, inner_area);
        return;
    }

    let horizontal_padding = 1;
    let header_height = render_metadata_header(f, app, inner_area);
    let mut content_area = inner_area;

    if header_height > 0 {
        // Horizontal separator that merges with the pane borders.
        let separator_y = inner_area.y + header_height;
        if separator_y < area.y + area.height - 1 {
            let separator = format!("├{}┤", "─".repeat(inner_area.width as usize));
            f.render_widget(
                Paragraph::new(separator).style(app.theme.border),
                Rect::new(area.x, separator_y, area.width, 1),
            );
            content_area = Rect::new(
                inner_area.x,
                separator_y + 1,
                inner_area.width,
                inner_area.height.saturating_sub(header_height + 1),
            );
        }
    }

    let content_width = content_area.width.saturating_sub(horizontal_padding * 2);
    if content_width == 0 || content_area.height == 0 {
        return;
    }

    let lines = detail_lines(app);
    let content_height = lines.len() as u16;

    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

    let scroll_area = scroll_view.area();
    scroll_view.buf_mut().set_style(scroll_area, app.theme.text);

    let content_rect = Rect::new(0, 0, content_width, content_height);
    scroll_view.render_widget(
        Paragraph::new(Text::from(lines)).style(app.theme.text),
        content_rect,
    );

    let scroll_view_area = Rect::new(
        content_area.x + horizontal_padding,
        content_area.y,
        content_width,
        content_area.height,
    );
    f.render_stateful_widget(scroll_view, scroll_view_area, &mut app.details_scroll_state);
}

/// Renders the title/year header row pair for the selected movie.
/// Returns the height occupied by the header (always 2).
fn render_metadata_header(f: &mut Frame, app: &mut AppState, area: Rect) -> u16 {
    let Some(movie) = app.selected() else {
        return 0;
    };

    let year = movie
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| " ".to_string());
    let genres = if movie.genres.is_empty() {
        " ".to_string()
    } else {
        movie.genres.join(", ")
    };
    let title = movie.title.clone();

    let horizontal_padding = 1;
    let header_area = Rect::new(
        area.x + horizontal_padding,
        area.y,
        area.width.saturating_sub(horizontal_padding * 2),
        2,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(header_area);

    let title_line = Line::from(Span::styled(
        title,
        app.theme.title,
    ));
    let meta_line = Line::from(vec![
        Span::styled("Year ", app.theme.text.fg(app.theme.detail_style.label)),
        Span::styled(year, app.theme.text.fg(app.theme.detail_style.value)),
        Span::raw("  "),
        Span::styled("Genres ", app.theme.text.fg(app.theme.detail_style.label)),
        Span::styled(genres, app.theme.text.fg(app.theme.detail_style.value)),
    ]);

    f.render_widget(Paragraph::new(title_line), rows[0]);
    f.render_widget(Paragraph::new(meta_line), rows[1]);

    2
}

/// Builds the scrollable body for the details pane: catalog fields and the
/// poster slot with its load status.
fn detail_lines(app: &AppState) -> Vec<Line<'static>> {
    let Some(movie_idx) = app.selected_movie else {
        return Vec::new();
    };
    let movie = &app.movies[movie_idx];
    let label = app.theme.text.fg(app.theme.detail_style.label);
    let value = app.theme.text.fg(app.theme.detail_style.value);
    let broken = app
        .theme
        .text
        .fg(app.theme.detail_style.broken)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(vec![
        Span::styled("Catalog ID  ".to_string(), label),
        Span::styled(movie.id.to_string(), value),
    ])];

    for (i, genre) in movie.genres.iter().enumerate() {
        let prefix = if i == 0 { "Genres      " } else { "            " };
        lines.push(Line::from(vec![
            Span::styled(prefix.to_string(), label),
            Span::styled(genre.clone(), value),
        ]));
    }

    lines.push(Line::from(""));

    match app.posters.slot(movie_idx) {
        Some(slot) if slot.status == PosterStatus::Broken => {
            lines.push(Line::from(vec![
                Span::styled("Poster      ".to_string(), label),
                Span::styled("✗ unavailable".to_string(), broken),
            ]));
            if slot.fallback_applied()
                && let Some(src) = &slot.src
            {
                lines.push(Line::from(vec![
                    Span::styled("            showing ".to_string(), label),
                    Span::styled(src.clone(), value),
                ]));
            }
        }
        Some(slot) => {
            let src = slot.src.clone().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled("Poster      ".to_string(), label),
                Span::styled(src, value),
            ]));
        }
        None => {}
    }

    lines
}

/// Renders the multisection status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_status_bar_shortcuts(f, app, chunks[0]);
    render_status_bar_counts(f, app, chunks[1]);
    render_status_bar_catalog(f, app, chunks[2]);
}

fn render_status_bar_shortcuts(f: &mut Frame, app: &mut AppState, area: Rect) {
    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("↓ ", key_style),
        Span::raw("suggestions  "),
        Span::styled("Tab ", key_style),
        Span::raw("details  "),
        Span::styled("Esc ", key_style),
        Span::raw("quit"),
    ]);

    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        area,
    );
}

fn render_status_bar_counts(f: &mut Frame, app: &mut AppState, area: Rect) {
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);
    let mut spans = vec![Span::raw(format!("Movies: {}", app.movies.len()))];
    if app.posters.broken_count() > 0 {
        spans.push(Span::raw(" |"));
        spans.push(Span::styled(
            format!(" {} broken posters", app.posters.broken_count()),
            app.theme
                .text
                .fg(app.theme.detail_style.broken)
                .add_modifier(Modifier::BOLD),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .style(bar_style)
            .alignment(Alignment::Center),
        area,
    );
}

fn render_status_bar_catalog(f: &mut Frame, app: &mut AppState, area: Rect) {
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);
    let catalog = Line::from(format!("{} {}", app.catalog_name, app.app_version));

    f.render_widget(
        Paragraph::new(catalog)
            .style(bar_style)
            .alignment(Alignment::Right),
        area,
    );
}

/// Calculates the terminal cell width offset for a given character index.
/// Uses `unicode-width` to correctly handle multibyte and multi-cell characters.
pub fn query_cursor_offset(text: &str, cursor: usize) -> u16 {
    text.chars()
        .take(cursor)
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum::<u16>()
}

/// Calculates horizontal viewport offset so the cursor stays visible in the input.
pub fn query_horizontal_scroll(text: &str, cursor: usize, visible_width: u16) -> u16 {
    if visible_width == 0 {
        return 0;
    }

    let cursor_offset = query_cursor_offset(text, cursor);
    cursor_offset.saturating_sub(visible_width.saturating_sub(1))
}

/// Maps a clicked column back to a character index in the query.
pub fn query_cursor_for_column(text: &str, target_column: u16) -> usize {
    let mut width = 0u16;
    for (idx, ch) in text.chars().enumerate() {
        let char_width = ch.width().unwrap_or(0) as u16;
        if width + char_width > target_column {
            return idx;
        }
        width += char_width;
    }
    text.chars().count()
}
