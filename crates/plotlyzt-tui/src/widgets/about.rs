use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use plotlyzt_core::page::ABOUT;

use super::{plot_trace, wrap};
use crate::app::App;

const MONITOR_ROWS: usize = 7;

pub(crate) fn lines(app: &App, width: usize, _rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let revealed = app.page.is_revealed(ABOUT);
    let text_width = width.saturating_sub(8).min(72);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Where Plotting Meets Analysis",
            if revealed {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            },
        )),
        Line::default(),
    ];
    if !revealed {
        return lines;
    }

    let story = "In cardiovascular research, every waveform tells a critical story. \
                 Plotlyzt combines the precision of plotting with the depth of analysis, \
                 turning ECG waveforms, heart rate variability and blood pressure data \
                 into actionable insights.";
    for line in wrap(story, text_width) {
        lines.push(Line::from(Span::styled(line, Style::default().fg(theme.grey1))));
    }
    lines.push(Line::default());

    let pattern = app.page.waveform().current();
    let color = theme.hex(pattern.color());
    lines.push(Line::from(vec![
        Span::styled(
            "Live ECG Analysis  ",
            Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
        ),
        Span::styled("● LIVE", Style::default().fg(theme.red)),
    ]));

    let plot_width = text_width;
    let scan = (app.scan_fraction() * plot_width as f64) as usize;
    for row in plot_trace(plot_width, MONITOR_ROWS, |col| {
        let x = col as f64 / plot_width.max(1) as f64 * 600.0;
        Some(0.5 - pattern.sample(x) / 2.0)
    }) {
        // Scan line sweeps across the monitor
        let (before, after): (String, String) = {
            let chars: Vec<char> = row.chars().collect();
            let split = scan.min(chars.len());
            (chars[..split].iter().collect(), chars[split..].iter().skip(1).collect())
        };
        let marker = if scan < plot_width { "┃" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(before, Style::default().fg(color)),
            Span::styled(marker, Style::default().fg(theme.fg0)),
            Span::styled(after, Style::default().fg(color).add_modifier(Modifier::DIM)),
        ]));
    }
    lines.push(Line::from(Span::styled(
        pattern.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    lines
}
