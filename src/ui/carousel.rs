// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scrolling cover strip for the landing screen.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Paragraph, Widget},
};

use crate::covers::{Cover, CoverWindow};

const PALETTE: [Color; 6] = [
    Color::Magenta,
    Color::Blue,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::Red,
];

/// Background color for a cover, stable per name
pub fn cover_color(cover: &Cover) -> Color {
    let sum: usize = cover.as_str().bytes().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}

/// Clip the horizontal span `[x, x + width)` to `[0, area_width)`.
///
/// Returns the first visible column and the visible width.
pub fn visible_span(x: f64, width: f64, area_width: u16) -> Option<(u16, u16)> {
    let start = x.max(0.0);
    let end = (x + width).min(area_width as f64);
    if end - start < 1.0 {
        return None;
    }
    let start_col = start.round() as u16;
    let end_col = (end.round() as u16).min(area_width);
    if end_col <= start_col {
        return None;
    }
    Some((start_col, end_col - start_col))
}

/// Five covers, each half the strip wide, shifted right by the scroll offset.
///
/// The leftmost cover starts one cover width off screen, so a full cycle
/// slides it into view.
pub struct CarouselWidget<'a> {
    window: &'a CoverWindow,
    offset: f64,
}

impl<'a> CarouselWidget<'a> {
    pub fn new(window: &'a CoverWindow, offset: f64) -> Self {
        Self { window, offset }
    }
}

impl Widget for CarouselWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let cover_width = area.width as f64 / 2.0;
        for (i, cover) in self.window.iter().enumerate() {
            let x = (i as f64 - 1.0) * cover_width + self.offset;
            let Some((col, width)) = visible_span(x, cover_width - 1.0, area.width) else {
                continue;
            };

            let tile = Rect::new(area.x + col, area.y, width, area.height);
            let style = Style::default().bg(cover_color(cover)).fg(Color::Black);
            Block::default().style(style).render(tile, buf);

            let label_row = Rect::new(tile.x, tile.y + tile.height / 2, tile.width, 1);
            Paragraph::new(cover.as_str())
                .style(style.add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .render(label_row, buf);
        }
    }
}
