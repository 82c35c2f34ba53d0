use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use plotlyzt_core::page::FLOW_STEPS;

use super::{center_text, wrap};
use crate::app::{px_to_cols, App};

const DESCRIPTIONS: [&str; 4] = [
    "Seamlessly upload your data and sync across all your devices in real-time. \
     Get started in seconds with our intuitive interface.",
    "Highlight important insights and add annotations to collaborate effectively \
     with your team members.",
    "Share your work with team members and gather feedback in one place. \
     Real-time collaboration made simple.",
    "Export your visualizations in multiple formats and share with stakeholders. \
     Perfect for presentations.",
];

/// The pinned block: one panel per step laid side by side, each `width`
/// columns wide. Rendered with [`scroll_cols`] as the horizontal offset.
pub(crate) fn lines(app: &App, width: usize, rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let current = app.page.flow().current_panel_index();

    let panels: Vec<Vec<(String, Style)>> = FLOW_STEPS
        .iter()
        .zip(DESCRIPTIONS)
        .enumerate()
        .map(|(i, (headline, description))| {
            let mut panel = vec![
                (format!("Step {:02}", i + 1), Style::default().fg(theme.grey0)),
                (
                    headline.to_string(),
                    Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
                ),
                (String::new(), Style::default()),
            ];
            for line in wrap(description, width.saturating_sub(12).min(60)) {
                panel.push((line, Style::default().fg(theme.grey1)));
            }
            panel
        })
        .collect();

    // Header repeats per panel so it stays put while the track slides
    let title = center_text("How It Works", width).repeat(FLOW_STEPS.len());
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            title,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    let body_rows = panels.iter().map(Vec::len).max().unwrap_or(0);
    let top_pad = rows.saturating_sub(body_rows + lines.len() + 2) / 2;
    lines.extend(std::iter::repeat(Line::default()).take(top_pad));

    for row in 0..body_rows {
        let spans: Vec<Span> = panels
            .iter()
            .map(|panel| match panel.get(row) {
                Some((text, style)) => Span::styled(center_text(text, width), *style),
                None => Span::raw(" ".repeat(width)),
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let dots: Vec<Span> = (0..FLOW_STEPS.len())
        .flat_map(|_| {
            let mut spans = vec![Span::raw(" ".repeat(width.saturating_sub(FLOW_STEPS.len() * 2) / 2))];
            for i in 0..FLOW_STEPS.len() {
                let style = if i == current {
                    Style::default().fg(theme.active)
                } else {
                    Style::default().fg(theme.grey0)
                };
                spans.push(Span::styled(if i == current { "● " } else { "○ " }, style));
            }
            let used = (width.saturating_sub(FLOW_STEPS.len() * 2) / 2) + FLOW_STEPS.len() * 2;
            spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
            spans
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(dots));
    lines
}

/// Horizontal offset of the track in columns
pub(crate) fn scroll_cols(app: &App) -> u16 {
    px_to_cols(-app.page.flow_translation()).clamp(0, u16::MAX as i64) as u16
}
