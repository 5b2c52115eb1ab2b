mod app;
mod ui;

use crate::utils::AppConfig;
use anyhow::Result;
use app::App;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub fn run(docs_root: PathBuf, config: AppConfig, initial_query: Option<String>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Catalog loads in background, typing works right away
    let mut app = App::new(docs_root, config);
    if let Some(query) = initial_query {
        app.set_query(&query);
    }

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Catalog load, page transfers and pending re-searches
        app.tick();

        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        // Only handle key press events, not release or repeat
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.mode == app::Mode::Help {
            app.hide_help();
            continue;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(()),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => app.erase_all(),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => app.backspace(),
            (modifiers, KeyCode::Char(c)) if is_alt_gr(modifiers) => app.push_char(c),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => {
                    if app.erase_segment() {
                        return Ok(());
                    }
                }
                KeyCode::Enter => app.open_top(),
                KeyCode::Down => app.scroll_down(),
                KeyCode::Up => app.scroll_up(),
                KeyCode::PageDown => app.scroll_page_down(),
                KeyCode::PageUp => app.scroll_page_up(),
                KeyCode::F(1) => app.show_help(),
                KeyCode::Char(c) => app.push_char(c),
                KeyCode::Backspace => app.backspace(),
                _ => {}
            },
            _ => {}
        }
    }
}

/// AltGr arrives as Control+Alt on Windows and types `@` or `#` on some layouts
fn is_alt_gr(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL | KeyModifiers::ALT)
}
