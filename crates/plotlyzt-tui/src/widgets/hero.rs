use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use plotlyzt_core::page::HeroAction;
use plotlyzt_core::scroll::parallax_offset;

use super::{center_vertically, wrap};
use crate::app::{px_to_rows, App};

const HERO_SPEED: f64 = 0.5;

pub(crate) fn lines(app: &App, width: usize, rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    // Faded until the handoff reveals it
    let visible = app.page.shell().is_hero_visible();
    let (title, body) = if visible {
        (
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            Style::default().fg(theme.grey1),
        )
    } else {
        (Style::default().fg(theme.muted), Style::default().fg(theme.muted))
    };

    let mut content = vec![
        Line::from(Span::styled("Visualize,", title)),
        Line::from(Span::styled("Annotate, Collaborate", title)),
        Line::default(),
    ];
    let description = "Turn time-series data into insights with our powerful event \
                       marking and visualization tool.";
    for line in wrap(description, width.saturating_sub(8).min(64)) {
        content.push(Line::from(Span::styled(line, body)));
    }
    content.push(Line::default());

    let primary = if visible {
        Style::default().fg(theme.bg0).bg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        body
    };
    let secondary = if visible {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        body
    };
    content.push(Line::from(vec![
        Span::styled(format!(" [s] {} ", HeroAction::GetStarted.label()), primary),
        Span::raw("   "),
        Span::styled(format!(" [d] {} ", HeroAction::ViewDemo.label()), secondary),
    ]));

    let mut lines = center_vertically(content, rows);
    if app.page.scroll_context().effects_enabled() {
        let drift = px_to_rows(parallax_offset(app.page.scroll_y(), HERO_SPEED)).max(0) as usize;
        let mut shifted = vec![Line::default(); drift];
        shifted.extend(lines);
        lines = shifted;
    }
    lines
}
