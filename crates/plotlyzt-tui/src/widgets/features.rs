use std::fmt::Display;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use plotlyzt_core::page::{
    ChartView, MarkingMode, ProcessingState, WaveformPattern, FEATURES, PROCESSING_FILES,
    PROCESSING_STEPS,
};
use plotlyzt_core::switcher::SwitchState;

use super::plot_trace;
use crate::app::App;
use crate::theme::Theme;

const CHART_ROWS: usize = 5;

pub(crate) fn lines(app: &App, width: usize, _rows: usize) -> Vec<Line<'static>> {
    let theme = &app.theme;
    let revealed = app.page.is_revealed(FEATURES);

    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Why Choose Plotlyzt",
            heading(theme, revealed),
        )),
        Line::default(),
    ];
    if !revealed {
        return lines;
    }

    // Interactive chart card
    let chart = app.page.chart_view();
    lines.push(Line::from(Span::styled(
        "Interactive Charts",
        Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
    )));
    lines.push(buttons(theme, &ChartView::ALL, chart.active_key()));
    lines.push(transition_line(theme, &chart.state()));

    let plot_width = width.saturating_sub(8).min(72);
    let traces: Vec<(WaveformPattern, Color)> = match chart.active_key() {
        ChartView::Ecg1 => vec![(WaveformPattern::Normal, theme.green)],
        ChartView::Ecg2 => vec![(WaveformPattern::Medicated, theme.blue)],
        ChartView::Dual => vec![
            (WaveformPattern::Normal, theme.green),
            (WaveformPattern::Medicated, theme.blue),
        ],
    };
    for (pattern, color) in traces {
        for row in plot_trace(plot_width, CHART_ROWS, |col| {
            let x = col as f64 / plot_width.max(1) as f64 * 600.0;
            Some(0.5 - pattern.sample(x) / 2.0)
        }) {
            lines.push(Line::from(Span::styled(row, Style::default().fg(color))));
        }
    }
    lines.push(Line::from(Span::styled(
        "[c] cycle view",
        Style::default().fg(theme.grey0),
    )));
    lines.push(Line::default());

    // Event marking card
    let marking = app.page.marking_mode();
    lines.push(Line::from(Span::styled(
        "Event Marking",
        Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
    )));
    lines.push(buttons(theme, &MarkingMode::ALL, marking.active_key()));
    lines.push(transition_line(theme, &marking.state()));
    let caption = match marking.active_key() {
        MarkingMode::Point => "Click a sample to drop a single event marker",
        MarkingMode::Range => "Drag across the trace to mark an event range",
    };
    lines.push(Line::from(Span::styled(
        caption,
        Style::default().fg(theme.grey1),
    )));
    lines.push(Line::from(Span::styled(
        "[p] point  [r] range",
        Style::default().fg(theme.grey0),
    )));
    lines.push(Line::default());

    // Signal processing card
    lines.push(Line::from(Span::styled(
        "Signal Processing",
        Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
    )));
    lines.extend(processing_lines(theme, app.page.processing().current()));
    lines.push(Line::from(Span::styled(
        "[u] upload",
        Style::default().fg(theme.grey0),
    )));

    lines
}

fn processing_lines(theme: &Theme, state: ProcessingState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let upload = if state.active {
        Span::styled(
            "Processing signals...",
            Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("Drop ECG files here", Style::default().fg(theme.fg0))
    };
    lines.push(Line::from(upload));
    lines.push(Line::from(Span::styled(
        "Auto-normalizes different sampling rates & amplitudes",
        Style::default().fg(theme.grey1),
    )));

    if state.active {
        let bar: String = (0..PROCESSING_STEPS.len())
            .map(|i| if i <= state.step { '■' } else { '□' })
            .collect();
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", bar), Style::default().fg(theme.accent)),
            Span::styled(
                state.title(),
                Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD),
            ),
        ]));
        let color = if state.step + 1 == PROCESSING_STEPS.len() {
            theme.green
        } else {
            theme.grey1
        };
        lines.push(Line::from(Span::styled(state.detail(), Style::default().fg(color))));
    }

    for (name, size) in PROCESSING_FILES {
        let (mark, color) = if state.active {
            ("…", theme.yellow)
        } else {
            ("✓", theme.green)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", mark), Style::default().fg(color)),
            Span::styled(name, Style::default().fg(theme.fg0)),
            Span::styled(format!("  {}", size), Style::default().fg(theme.grey0)),
        ]));
    }
    lines
}

fn heading(theme: &Theme, revealed: bool) -> Style {
    if revealed {
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    }
}

/// One button per key; the active one highlighted
fn buttons<K: Copy + PartialEq + Display>(theme: &Theme, keys: &[K], active: K) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if *key == active {
            Style::default().fg(theme.bg0).bg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg0).bg(theme.bg2)
        };
        spans.push(Span::styled(format!(" {} ", key), style));
    }
    Line::from(spans)
}

fn transition_line<K: Display>(theme: &Theme, state: &SwitchState<K>) -> Line<'static> {
    match state {
        SwitchState::Idle(_) => Line::default(),
        SwitchState::Transitioning { from, to, phase } => Line::from(Span::styled(
            format!("{} → {} ({:?})", from, to, phase),
            Style::default().fg(theme.yellow).add_modifier(Modifier::ITALIC),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use plotlyzt_core::AppConfig;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_card_follows_session() {
        let mut config = AppConfig::default();
        config.visibility.observer_enabled = false;
        let mut app = App::new(Arc::new(config), Theme::dark(), 120, 40);
        tokio::time::sleep(Duration::from_millis(3001)).await;

        let idle = text(&lines(&app, 100, 40));
        assert!(idle.contains("Drop ECG files here"));
        assert!(idle.contains("✓ ecg_patient_a.csv"));

        app.start_processing();
        tokio::time::sleep(Duration::from_millis(2001)).await;
        let busy = text(&lines(&app, 100, 40));
        assert!(busy.contains("Processing signals..."));
        assert!(busy.contains("■■□□ Resampling to Common Rate"));

        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert!(text(&lines(&app, 100, 40)).contains("Drop ECG files here"));
    }
}
