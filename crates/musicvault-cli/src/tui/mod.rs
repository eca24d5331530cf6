use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use musicvault_setlist::{PerformanceNavigator, Setlist};
use ratatui::prelude::*;

pub mod stage;

/// Application state for performance mode.
#[derive(Debug)]
pub struct App {
    pub title: String,
    pub navigator: PerformanceNavigator,
    pub should_quit: bool,
}

impl App {
    pub fn new(setlist: &Setlist) -> Self {
        Self {
            title: setlist.event().title.clone(),
            navigator: PerformanceNavigator::new(setlist),
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l' | ' ') | KeyCode::PageDown => {
                self.navigator.advance();
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
                self.navigator.retreat();
            }
            _ => {}
        }
    }
}

/// Run performance mode over a frozen copy of the setlist.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_performance(setlist: &Setlist) -> Result<()> {
    let app = App::new(setlist);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| stage::render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use musicvault_core::model::{BandishId, Karyakram, KaryakramId, KaryakramStatus};
    use musicvault_setlist::{ItemIdentity, SetlistItem};

    fn app(n: usize) -> App {
        let event = Karyakram {
            id: KaryakramId::new(),
            created_at: Utc::now(),
            title: "Sandhya".to_string(),
            date: None,
            venue: None,
            notes: None,
            status: KaryakramStatus::Planned,
        };
        let items = (0..n)
            .map(|i| SetlistItem {
                id: ItemIdentity::Pending(i as u64),
                event_id: event.id,
                composition_id: BandishId::new(),
                sequence_ordinal: i as u32 + 1,
                composition: None,
            })
            .collect();
        App::new(&Setlist::new(event, items))
    }

    #[test]
    fn test_keys_move_the_cursor() {
        let mut app = app(3);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char(' '));
        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.navigator.cursor(), Some(2));

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Char('h'));
        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.navigator.cursor(), Some(0));
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit() {
        let mut app = app(1);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_render_shows_progress_and_end_of_set() {
        let mut app = app(2);
        app.navigator.advance();

        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| stage::render(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("2 / 2"));
        assert!(text.contains("End of Set"));
    }
}
