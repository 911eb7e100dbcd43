// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Player count and player slot widgets.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::roster::{PlayerRoster, PlayerSlot};
use crate::setup::PlayerCountSelector;

/// Row of the allowed player counts with the current one highlighted
pub struct PlayerCountWidget<'a> {
    selector: &'a PlayerCountSelector,
}

impl<'a> PlayerCountWidget<'a> {
    pub fn new(selector: &'a PlayerCountSelector) -> Self {
        Self { selector }
    }
}

impl Widget for PlayerCountWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let selected = self.selector.count();
        let mut spans = vec![Span::styled("<  ", Style::default().fg(Color::DarkGray))];
        for count in self.selector.choices() {
            let style = if count == selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", count), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(" >", Style::default().fg(Color::DarkGray)));

        let lines = vec![
            Line::from(Span::styled(
                "How many players?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(spans),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} players", selected),
                Style::default().fg(Color::Cyan),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Slot line as shown on the song screen
pub fn slot_line(slot: &PlayerSlot, highlighted: bool) -> Line<'static> {
    let marker = if highlighted { "> " } else { "  " };
    let name_style = if highlighted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let state = if slot.is_locked() {
        Span::styled(
            "[LOCKED]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[ pick a song ]", Style::default().fg(Color::DarkGray))
    };

    Line::from(vec![
        Span::styled(marker, name_style),
        Span::styled(format!("Player {:<3}", slot.index() + 1), name_style),
        state,
    ])
}

/// One line per player, with a lock marker once a song is chosen.
///
/// Song titles stay hidden.
pub struct RosterWidget<'a> {
    roster: &'a PlayerRoster,
    cursor: usize,
}

impl<'a> RosterWidget<'a> {
    pub fn new(roster: &'a PlayerRoster, cursor: usize) -> Self {
        Self { roster, cursor }
    }
}

impl Widget for RosterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines: Vec<Line> = self
            .roster
            .slots()
            .iter()
            .map(|slot| slot_line(slot, slot.index() == self.cursor))
            .collect();

        lines.push(Line::from(""));
        let progress = format!(
            "{}/{} locked in",
            self.roster.locked_count(),
            self.roster.len()
        );
        let progress_style = if self.roster.is_complete() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(Span::styled(progress, progress_style)));

        Paragraph::new(lines).render(area, buf);
    }
}
