use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use plotlyzt_core::page::{
    ecg_progress, visible_prompts, EcgTrace, LOADING_PROMPTS, STAGE_FADE_OUT,
};

use super::{center_vertically, plot_trace};
use crate::app::App;

const TRACE_ROWS: usize = 9;

/// Loading screen: the ECG trace drawing in, then the loading prompts
pub struct SplashWidget;

impl SplashWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let config = &app.config.intro;
        let elapsed = app.page.shell().intro_elapsed();
        let fading = app.page.shell().intro_progress().name.as_deref() == Some(STAGE_FADE_OUT);

        let trace_style = if fading {
            Style::default().fg(theme.muted)
        } else {
            Style::default().fg(theme.trace)
        };

        let trace = EcgTrace::for_viewport(
            app.page.viewport(),
            app.config.visibility.mobile_breakpoint_px,
        );
        let width = (area.width as usize).saturating_sub(8).min(100);
        let drawn = (ecg_progress(elapsed, config) * width as f64).round() as usize;
        let rows = plot_trace(width, TRACE_ROWS, |col| {
            if col >= drawn {
                return None;
            }
            let x = col as f64 / width.max(1) as f64 * trace.view_width;
            Some(trace.y_at(x) / trace.view_height)
        });

        let mut content: Vec<Line<'static>> = rows
            .into_iter()
            .map(|row| Line::from(Span::styled(row, trace_style)))
            .collect();
        content.push(Line::default());

        let shown = visible_prompts(elapsed, config);
        for (i, prompt) in LOADING_PROMPTS.iter().enumerate() {
            let line = if i < shown {
                let style = if i + 1 == shown && !fading {
                    Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.grey1)
                };
                Line::from(Span::styled(format!("> {}", prompt), style))
            } else {
                Line::default()
            };
            content.push(line);
        }

        if config.skippable {
            content.push(Line::default());
            content.push(Line::from(Span::styled(
                "press any key to skip",
                Style::default().fg(theme.grey0).add_modifier(Modifier::ITALIC),
            )));
        }

        let paragraph = Paragraph::new(center_vertically(content, area.height as usize))
            .alignment(Alignment::Center)
            .block(Block::default().style(Style::default().bg(theme.bg0)));
        frame.render_widget(paragraph, area);
    }
}
