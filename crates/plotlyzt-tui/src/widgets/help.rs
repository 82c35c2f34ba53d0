use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

const BINDINGS: [(&str, &str); 13] = [
    ("j/k, ↓/↑", "Scroll"),
    ("Ctrl-d/u", "Half page down/up"),
    ("Ctrl-f/b, Space", "Page down/up"),
    ("g / G", "Top / bottom"),
    ("1-6", "Jump to section"),
    ("Tab / Enter", "Select and follow link"),
    ("m", "Toggle menu"),
    ("s / d", "Get Started / View Demo"),
    ("c", "Cycle chart view"),
    ("p / r", "Point / range marking"),
    ("u", "Run signal processing demo"),
    ("?", "Close help"),
    ("q", "Quit"),
];

pub struct HelpWidget;

impl HelpWidget {
    pub fn render(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let area = frame.area();
        let width = 48u16.min(area.width.saturating_sub(4));
        let height = (BINDINGS.len() as u16 + 2).min(area.height.saturating_sub(2));
        let popup = centered_rect(width, height, area);

        let lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {:<16}", keys),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*what, Style::default().fg(theme.fg0)),
                ])
            })
            .collect();

        frame.render_widget(Clear, popup);
        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
