use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use plotlyzt_core::page::{PagePhase, FLOW_STEPS};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.bg2);

        let phase = match app.phase() {
            PagePhase::Loading => "LOADING",
            PagePhase::Handoff => "HANDOFF",
            PagePhase::Ready => "READY",
        };

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let max = app.page.tracker().content_height() - app.page.viewport().height as f64;
            let percent = if max > 0.0 {
                (app.page.scroll_y() / max * 100.0).round() as u32
            } else {
                0
            };
            let flow = app.page.flow();
            let pinned = if *flow.pinned().borrow() { " (pinned)" } else { "" };
            format!(
                " {} | {} | Step {}/{}{} | {}%",
                phase,
                app.page.nav().active(),
                flow.current_panel_index() + 1,
                FLOW_STEPS.len(),
                pinned,
                percent
            )
        };

        let help_hint = " q:quit j/k:scroll 1-6:sections ?:help ";
        let padding_len = (area.width as usize)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.fg0)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.grey1)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
