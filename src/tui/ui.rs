use crate::query::state::QueryMode;
use crate::search::{DisplayLine, LineStyle};
use crate::tui::app::{App, Mode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    match app.mode {
        Mode::Search => draw_results(f, app, chunks[1]),
        Mode::Help => draw_help(f, chunks[1]),
    }
    draw_status_bar(f, app, chunks[2]);
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.query_mode() {
        QueryMode::Name => " Search ",
        QueryMode::Member => " Search members ",
        QueryMode::Menu => " Menu ",
    };
    let input = Paragraph::new(app.field.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(input, area);

    if app.mode == Mode::Search {
        let width = app.field.chars().count() as u16;
        f.set_cursor_position((area.x + width + 1, area.y + 1));
    }
}

fn styled_line(line: &DisplayLine) -> Line<'_> {
    match line {
        DisplayLine::Heading(text) => Line::from(Span::styled(
            text.as_str(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        DisplayLine::Entry {
            text,
            detail,
            url: _,
            style,
        } => {
            let text_style = match style {
                LineStyle::Normal => Style::default(),
                LineStyle::Highlight => Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
                LineStyle::Dim => Style::default().fg(Color::DarkGray),
            };
            let mut spans = vec![Span::raw("  "), Span::styled(text.as_str(), text_style)];
            if let Some(detail) = detail {
                spans.push(Span::styled(
                    format!(" ({})", detail),
                    Style::default().fg(Color::Blue),
                ));
            }
            Line::from(spans)
        }
        DisplayLine::Text(text) => Line::from(text.as_str()),
        DisplayLine::Blank => Line::default(),
    }
}

fn draw_results(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = app
        .lines
        .iter()
        .skip(app.scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(styled_line)
        .collect();

    let title = match &app.top_url {
        Some(url) => format!(" {} ", url),
        None => format!(" {} ", app.docs_root.display()),
    };
    let results = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });

    f.render_widget(results, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let keys = [
        ("text", "search packages and classes (JLO, java.*.o*e)"),
        ("#text", "search members of the top result"),
        ("@", "open the command menu, @N runs item N"),
        ("Enter", "open the top result in the browser"),
        ("Esc", "erase the active segment, quit when empty"),
        ("Ctrl+U", "erase the whole query"),
        ("Up/Down", "scroll results"),
        ("Ctrl+C", "quit"),
    ];

    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(format!("{:>8}  ", key), Style::default().fg(Color::Yellow)),
                Span::raw(*description),
            ])
        })
        .collect();

    let help = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Help (any key closes) "));
    f.render_widget(help, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut status = app.status_message.clone();
    if let Some(loader) = app.loader_status() {
        status.push_str(" | ");
        status.push_str(&loader);
    }
    if let Some(ms) = app.last_search_ms {
        status.push_str(&format!(" | {} ms", ms));
    }
    if !app.is_loading() {
        status.push_str(" | F1: help");
    }

    let status = Paragraph::new(status).style(Style::default().fg(Color::Cyan));
    f.render_widget(status, area);
}
