use musicvault_setlist::{SetlistItem, Upcoming};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::App;

/// Render the current bandish full screen.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Event and progress
            Constraint::Min(5),    // Current bandish
            Constraint::Length(3), // Up next
            Constraint::Length(1), // Keys
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_current(frame, app, chunks[1]);
    render_upcoming(frame, app, chunks[2]);
    render_help(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            app.navigator.progress().to_string(),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_current(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.navigator.current() {
        Ok(item) => item_lines(item),
        Err(_) => vec![Line::from(Span::styled(
            "The setlist is empty.",
            Style::default().fg(Color::Yellow),
        ))],
    };

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn item_lines(item: &SetlistItem) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        item.title().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let Some(composition) = &item.composition else {
        lines.push(Line::from(Span::styled(
            "This bandish is no longer in the archive.",
            Style::default().fg(Color::Red),
        )));
        return lines;
    };

    lines.push(Line::from(Span::styled(
        format!(
            "{} · {} · {} · {}",
            composition.raga_name.as_deref().unwrap_or("General"),
            composition.kind,
            composition.tala,
            composition.tempo
        ),
        Style::default().fg(Color::Cyan),
    )));
    lines.push(Line::from(""));

    match &composition.lyrics {
        Some(lyrics) => lines.extend(lyrics.lines().map(|l| Line::from(l.to_string()))),
        None => lines.push(Line::from(Span::styled(
            "No lyrics recorded.",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    for (label, reference) in [
        ("Audio", &composition.audio_ref),
        ("Notation", &composition.notation_ref),
    ] {
        if let Some(reference) = reference {
            lines.push(Line::from(Span::styled(
                format!("{label}: {reference}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines
}

fn render_upcoming(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.navigator.upcoming() {
        Upcoming::Next(item) => Line::from(vec![
            Span::styled("Up next: ", Style::default().fg(Color::DarkGray)),
            Span::raw(item.title().to_string()),
        ]),
        Upcoming::EndOfSet => Line::from(Span::styled(
            "End of Set",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    };
    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2190}/h Prev  \u{2192}/l/space Next  q Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
