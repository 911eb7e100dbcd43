// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for Song Roulette.
//!
//! Provides a ratatui-based interface with the landing carousel, the player
//! count picker, and the per-player song picker.

mod carousel;
mod model;
mod picker;
mod roster;

pub use carousel::{cover_color, visible_span, CarouselWidget};
pub use model::{KeyAction, StripState, UiModel, STATUS_TIMEOUT};
pub use picker::{centered_rect, PickerWidget};
pub use roster::{slot_line, PlayerCountWidget, RosterWidget};

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::setup::Screen;

/// Terminal UI application
pub struct App {
    model: UiModel,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
}

impl App {
    /// Take over the terminal.
    ///
    /// The model should be created with the current terminal width, see
    /// [`terminal_width`].
    pub fn new(model: UiModel) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            model,
            terminal,
            frame_rate: 30,
        })
    }

    /// UI state
    pub fn model(&self) -> &UiModel {
        &self.model
    }

    /// Run until the user quits
    pub fn run(&mut self) -> io::Result<()> {
        while self.model.is_running() {
            self.model.tick();
            self.draw()?;

            if let Some(Event::Key(key)) = self.poll_event()? {
                if key.kind == KeyEventKind::Press {
                    self.model.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(())
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw(&mut self) -> io::Result<()> {
        let model = &mut self.model;
        self.terminal.draw(|frame| {
            let area = frame.area();
            model.set_viewport_width(area.width as f64);
            render(frame, area, model);
        })?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Current terminal width in cells, or 80 if it cannot be read
pub fn terminal_width() -> f64 {
    crossterm::terminal::size()
        .map(|(width, _)| width as f64)
        .unwrap_or(80.0)
}

/// Draw the whole screen for `model`
pub fn render(frame: &mut Frame, area: Rect, model: &UiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_title(frame, chunks[0], model.screen());

    match model.screen() {
        Screen::Landing => render_landing(frame, chunks[1], model),
        Screen::PlayerSelect => render_player_select(frame, chunks[1], model),
        Screen::SongSelect => render_song_select(frame, chunks[1], model),
    }

    render_status_bar(frame, chunks[2], model);

    if model.show_help() {
        render_help_overlay(frame, area);
    }
}

fn render_title(frame: &mut Frame, area: Rect, screen: Screen) {
    let subtitle = match screen {
        Screen::Landing => "",
        Screen::PlayerSelect => "  |  Players",
        Screen::SongSelect => "  |  Pick your songs",
    };
    let title = Line::from(vec![
        Span::styled(
            "SONG ROULETTE",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(subtitle, Style::default().fg(Color::Gray)),
    ]);

    let widget = Paragraph::new(title)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(widget, area);
}

fn render_landing(frame: &mut Frame, area: Rect, model: &UiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),    // Carousel
            Constraint::Length(1),
            Constraint::Length(1), // Prompt
            Constraint::Length(1),
        ])
        .split(area);

    let strip = model.strip();
    frame.render_widget(CarouselWidget::new(&strip.window, strip.offset()), chunks[1]);

    let prompt = Paragraph::new(Span::styled(
        "Press Enter to Play",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[3]);
}

fn render_player_select(frame: &mut Frame, area: Rect, model: &UiModel) {
    let inner = centered_rect(60, 7, area);
    frame.render_widget(PlayerCountWidget::new(model.navigator().selector()), inner);
}

fn render_song_select(frame: &mut Frame, area: Rect, model: &UiModel) {
    let Some(session) = model.session() else {
        return;
    };

    let block = Block::default().borders(Borders::ALL).title(" Players ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(RosterWidget::new(session.roster(), model.slot_cursor()), inner);

    if let Some(slot) = session.active_slot() {
        let popup = centered_rect(60, 16, area);
        let picker = PickerWidget::new(slot, model.input(), session.results(), model.result_cursor())
            .searching(session.is_searching());
        frame.render_widget(picker, popup);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, model: &UiModel) {
    let text = if let Some(msg) = model.status_message() {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else {
        let hint = match model.screen() {
            Screen::Landing => " Enter: Play | h: Help | q: Quit",
            Screen::PlayerSelect => " Up/Down or 3-9: Players | Enter: Start | Esc: Back | q: Quit",
            Screen::SongSelect => {
                let picking = model.session().map(|s| s.picker_open()).unwrap_or(false);
                if picking {
                    " Type to search | Up/Down: Choose | Enter: Lock in | Esc: Close"
                } else {
                    " Up/Down or 1-9: Player | Enter: Pick song | Esc: Back | q: Quit"
                }
            }
        };
        Span::styled(hint, Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(Paragraph::new(text), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered_rect(50, 17, area);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Landing", bold)),
        Line::from("  Enter/Space  Play"),
        Line::from(""),
        Line::from(Span::styled("Players", bold)),
        Line::from("  Up/Down      More/fewer players"),
        Line::from("  3-9          Set player count"),
        Line::from("  Enter        Start song selection"),
        Line::from(""),
        Line::from(Span::styled("Songs", bold)),
        Line::from("  1-9/Enter    Open picker for a player"),
        Line::from("  Esc          Close picker or go back"),
        Line::from(""),
        Line::from(Span::styled("Other", bold)),
        Line::from("  h/?          Toggle help"),
        Line::from("  q/Ctrl+c     Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn draw(model: &UiModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, area, model);
            })
            .unwrap();
        screen_text(&terminal)
    }

    #[tokio::test]
    async fn test_render_landing() {
        let model = UiModel::new(&AppConfig::default(), 80.0);
        let text = draw(&model);
        assert!(text.contains("SONG ROULETTE"));
        assert!(text.contains("Press Enter to Play"));
        assert!(text.contains("album1"));
    }

    #[tokio::test]
    async fn test_render_each_screen() {
        let mut model = UiModel::new(&AppConfig::default(), 80.0);

        model.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(draw(&model).contains("How many players?"));

        model.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        let text = draw(&model);
        assert!(text.contains("Player 3"));
        assert!(text.contains("0/3 locked in"));

        model.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        let text = draw(&model);
        assert!(text.contains("Pick a song for Player 1"));
        assert!(text.contains("Type a title or artist"));
    }

    #[tokio::test]
    async fn test_render_help() {
        let mut model = UiModel::new(&AppConfig::default(), 80.0);
        model.handle_key(KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(draw(&model).contains("Toggle help"));
    }
}
