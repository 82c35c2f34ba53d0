use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph},
    Frame,
};

use plotlyzt_core::page::{ABOUT, CONTACT, FEATURES, FLOW, HOME, SECTIONS, USE_CASES};

use super::{about, contact, features, flow, hero, use_cases};
use crate::app::{px_to_rows, App};

/// The scrolling document: every section placed at its layout offset and
/// clipped to the page area
pub struct PageWidget;

impl PageWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        frame.render_widget(
            Block::default().style(Style::default().bg(app.theme.bg0)),
            area,
        );

        let width = area.width as usize;
        let view_rows = area.height as i64;
        let scroll_row = app.scroll_row();

        for spec in SECTIONS.iter() {
            let Some(rect) = app.page.tracker().rect(spec.id) else {
                continue;
            };
            let top = px_to_rows(rect.top);
            let rows = px_to_rows(rect.height);

            if spec.id == FLOW {
                // Sticky while the track is pinned
                let pin = (rows - view_rows).max(0);
                let block_top = top + (scroll_row - top).clamp(0, pin);
                let lines = flow::lines(app, width, view_rows as usize);
                Self::render_clipped(
                    frame,
                    area,
                    Paragraph::new(lines),
                    block_top - scroll_row,
                    view_rows,
                    flow::scroll_cols(app),
                );
                continue;
            }

            let lines: Vec<Line<'static>> = match spec.id {
                HOME => hero::lines(app, width, rows as usize),
                FEATURES => features::lines(app, width, rows as usize),
                USE_CASES => use_cases::lines(app, width, rows as usize),
                ABOUT => about::lines(app, width, rows as usize),
                CONTACT => contact::lines(app, width, rows as usize),
                _ => Vec::new(),
            };
            Self::render_clipped(
                frame,
                area,
                Paragraph::new(lines).alignment(Alignment::Center),
                top - scroll_row,
                rows,
                0,
            );
        }
    }

    /// Render a block of `rows` rows starting `start` rows below the top of
    /// `area`, showing only the part inside it. `cols` shifts it left.
    fn render_clipped(
        frame: &mut Frame,
        area: Rect,
        paragraph: Paragraph,
        start: i64,
        rows: i64,
        cols: u16,
    ) {
        let first = start.max(0);
        let last = (start + rows).min(area.height as i64);
        if last <= first {
            return;
        }
        let skip = (first - start) as u16;
        let target = Rect {
            x: area.x,
            y: area.y + first as u16,
            width: area.width,
            height: (last - first) as u16,
        };
        frame.render_widget(paragraph.scroll((skip, cols)), target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use plotlyzt_core::AppConfig;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::theme::Theme;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_hero_on_top_and_flow_pinned_below() {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::dark(), 120, 40);
        app.skip_intro();
        tokio::time::sleep(Duration::from_millis(400)).await;

        let mut terminal = Terminal::new(TestBackend::new(120, 38)).unwrap();
        terminal
            .draw(|frame| PageWidget::render(frame, frame.area(), &app))
            .unwrap();
        assert!(screen(&terminal).contains("Visualize,"));

        // Halfway through the flow pin: the block is stuck to the top
        let flow = app.page.tracker().rect(FLOW).unwrap();
        app.page.tracker().set_scroll(flow.top + 300.0);
        terminal
            .draw(|frame| PageWidget::render(frame, frame.area(), &app))
            .unwrap();
        let text = screen(&terminal);
        assert!(text.contains("How It Works"));
        assert!(!text.contains("Visualize,"));
    }
}
