// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song picker overlay.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::catalog::SongRef;

/// Search box plus result list for one player
pub struct PickerWidget<'a> {
    slot: usize,
    input: &'a str,
    results: &'a [SongRef],
    cursor: usize,
    searching: bool,
}

impl<'a> PickerWidget<'a> {
    pub fn new(slot: usize, input: &'a str, results: &'a [SongRef], cursor: usize) -> Self {
        Self {
            slot,
            input,
            results,
            cursor,
            searching: false,
        }
    }

    /// Show that a search is still in flight
    pub fn searching(mut self, searching: bool) -> Self {
        self.searching = searching;
        self
    }
}

impl Widget for PickerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Pick a song for Player {} ", self.slot + 1))
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(Color::Cyan)),
                Span::styled(self.input, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("_", Style::default().fg(Color::DarkGray)),
            ]),
            Line::from(""),
        ];

        if self.results.is_empty() {
            let hint = if self.input.trim().is_empty() {
                "Type a title or artist"
            } else if self.searching {
                "Searching..."
            } else {
                "No songs found"
            };
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )));
        }

        let visible = inner.height.saturating_sub(2) as usize;
        let first = self.cursor.saturating_sub(visible.saturating_sub(1));
        for (i, song) in self.results.iter().enumerate().skip(first).take(visible) {
            let style = if i == self.cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(format!(" {} ", song), style)));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
