use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::wrap;
use crate::app::App;

struct UseCase {
    title: &'static str,
    badge: &'static str,
    description: &'static str,
    color: &'static str,
}

const USE_CASES: [UseCase; 4] = [
    UseCase {
        title: "Medical ECG Review",
        badge: "Healthcare Excellence",
        description: "Advanced ECG analysis and cardiac monitoring with real-time pattern \
                      recognition.",
        color: "#ff6b6b",
    },
    UseCase {
        title: "IoT Sensor Data Analysis",
        badge: "Smart Connectivity",
        description: "Monitor and analyze data from thousands of IoT sensors in real-time.",
        color: "#4ecdc4",
    },
    UseCase {
        title: "Scientific Research",
        badge: "Data-Driven Discovery",
        description: "Accelerate scientific breakthroughs with advanced data visualization \
                      and analysis tools.",
        color: "#a8e6cf",
    },
    UseCase {
        title: "Quality Control in Manufacturing",
        badge: "Operational Excellence",
        description: "Ensure product quality with comprehensive monitoring and analysis of \
                      manufacturing processes.",
        color: "#ffd93d",
    },
];

pub(crate) fn lines(app: &App, width: usize, _rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let text_width = width.saturating_sub(8).min(70);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Use Cases",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];
    for case in &USE_CASES {
        let color = theme.hex(case.color);
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("[ {} ]", case.badge),
            Style::default().fg(color),
        )));
        lines.push(Line::from(Span::styled(
            case.title,
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        )));
        for line in wrap(case.description, text_width) {
            lines.push(Line::from(Span::styled(line, Style::default().fg(theme.grey1))));
        }
    }
    lines
}
