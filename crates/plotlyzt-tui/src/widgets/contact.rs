use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::{center_vertically, wrap};
use crate::app::App;

pub(crate) fn lines(app: &App, width: usize, rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let mut content = vec![
        Line::from(Span::styled(
            "Let's Connect",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    let pitch = "Ready to transform your data into stunning visualizations? Schedule a \
                 personalized demo and discover how Plotlyzt can revolutionize your \
                 analysis workflow.";
    for line in wrap(pitch, width.saturating_sub(8).min(64)) {
        content.push(Line::from(Span::styled(line, Style::default().fg(theme.grey1))));
    }
    content.push(Line::default());
    content.push(Line::from(Span::styled(
        "hello@plotlyzt.com",
        Style::default().fg(theme.blue).add_modifier(Modifier::UNDERLINED),
    )));
    content.push(Line::from(Span::styled(
        "Questions? We're here to help you succeed",
        Style::default().fg(theme.grey0),
    )));
    center_vertically(content, rows)
}
