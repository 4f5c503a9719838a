//! # flick-tui
//!
//! A terminal user interface for searching a movie catalog: type to filter
//! suggestions, pick one with the keyboard or mouse, and inspect it in the
//! details pane.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use flick_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use flick_tui::app_core::reducer;
use flick_tui::app_core::state::AppState;
use flick_tui::poster::{self, DirProbe, Gallery};
use flick_tui::{data, theme, ui};
use ratatui::{Terminal, backend::CrosstermBackend};

use std::io;
use std::path::Path;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "flick-tui: a terminal user interface for searching a movie catalog.\n\
                  Type to filter the suggestion dropdown, navigate it with the arrow keys,\n\
                  and select with Enter or a mouse click."
)]
struct Args {
    /// Path to the catalog JSON file
    #[arg(short, long, default_value = "movies.json")]
    file: String,

    /// Directory containing poster images (defaults to the catalog's directory)
    #[arg(short, long)]
    posters: Option<String>,

    /// UI theme (dracula, solarized, gruvbox)
    #[arg(short, long)]
    theme: Option<String>,
}

// ---------------------------------------------------------------------------
// Crossterm → reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let super_key = modifiers.contains(KeyModifiers::SUPER);

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: ctrl || super_key,
        alt,
        is_release: false,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        _ => return None,
    };
    Some(AppMouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    })
}

fn handle_key_event(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) {
    let Some(event) = crossterm_to_app_key_event(code, modifiers, kind) else {
        return;
    };
    reducer::handle_key_event(app, event);
}

fn handle_mouse_event(app: &mut AppState, mouse: event::MouseEvent) -> bool {
    let Some(app_event) = crossterm_to_app_mouse_event(&mouse) else {
        return false;
    };
    reducer::handle_mouse_event(app, app_event)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme_enum = theme::Theme::from_str(theme_name).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();

    let catalog = data::load_catalog(&args.file)?;
    let catalog_name = if catalog.name.is_empty() {
        args.file.clone()
    } else {
        catalog.name.clone()
    };
    let movies = data::build_movies(catalog);

    // One eager poster check pass before the terminal takes over.
    let sources: Vec<(Option<String>, Option<String>)> = movies
        .iter()
        .map(|m| (m.poster.clone(), m.poster_fallback.clone()))
        .collect();
    let posters = if let Some(dir) = &args.posters {
        let dir = Path::new(dir);
        if !dir.is_dir() {
            anyhow::bail!("Posters path is not a directory: {}", dir.display());
        }
        let probe = DirProbe::scan(dir);
        Gallery::build(&sources, |src| probe.probe(src))
    } else {
        let base = Path::new(&args.file)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Gallery::build(&sources, |src| poster::fs_probe(&base, src))
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(movies, posters, theme, catalog_name, app_version);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        match event::read()? {
            Event::Key(key) => {
                handle_key_event(app, key.code, key.modifiers, key.kind);
                terminal.draw(|f| ui::ui(f, app))?;
            }
            Event::Mouse(mouse) => {
                if handle_mouse_event(app, mouse) {
                    terminal.draw(|f| ui::ui(f, app))?;
                }
            }
            Event::Resize(_, _) => {
                terminal.draw(|f| ui::ui(f, app))?;
            }
            _ => {}
        }
    }
    Ok(())
}
