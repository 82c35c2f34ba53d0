use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use plotlyzt_core::page::NAV_LINKS;

use crate::app::App;

const BRAND: &str = " ◆ Plotlyzt ";
const MENU_BUTTON: &str = " ☰ Menu ";

pub struct NavbarWidget;

impl NavbarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.bg1);
        let active = app.page.nav().active();

        let mut spans = vec![Span::styled(
            BRAND,
            bar.fg(theme.accent).add_modifier(Modifier::BOLD),
        )];

        if app.page.is_mobile() {
            let used = BRAND.width() + MENU_BUTTON.width();
            spans.push(Span::styled(
                " ".repeat((area.width as usize).saturating_sub(used)),
                bar,
            ));
            let style = if app.page.nav().is_menu_open() {
                bar.fg(theme.bg0).bg(theme.accent)
            } else {
                bar.fg(theme.fg0)
            };
            spans.push(Span::styled(MENU_BUTTON, style));
        } else {
            for (i, link) in NAV_LINKS.iter().enumerate() {
                let mut style = if *link == active {
                    bar.fg(theme.active).add_modifier(Modifier::BOLD)
                } else {
                    bar.fg(theme.fg0)
                };
                if i == app.nav_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                spans.push(Span::styled(" ", bar));
                spans.push(Span::styled(format!(" {} ", link), style));
            }
            let used: usize = spans.iter().map(|s| s.content.width()).sum();
            spans.push(Span::styled(
                " ".repeat((area.width as usize).saturating_sub(used)),
                bar,
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Dropdown listing the links under the navbar on narrow terminals
    pub fn render_menu(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let width = NAV_LINKS.iter().map(|l| l.width()).max().unwrap_or(0) as u16 + 6;
        let menu = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y + 1,
            width: width.min(area.width),
            height: (NAV_LINKS.len() as u16 + 2).min(area.height.saturating_sub(1)),
        };

        let active = app.page.nav().active();
        let lines: Vec<Line> = NAV_LINKS
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let mut style = Style::default().fg(theme.fg0);
                if *link == active {
                    style = style.fg(theme.active).add_modifier(Modifier::BOLD);
                }
                if i == app.nav_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Line::from(Span::styled(format!(" {} {}", i + 1, link), style))
            })
            .collect();

        frame.render_widget(Clear, menu);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        frame.render_widget(Paragraph::new(lines).block(block), menu);
    }

    /// Nav link under column `column` of the bar, on wide terminals
    pub fn link_at(column: u16) -> Option<usize> {
        let mut x = BRAND.width();
        for (i, link) in NAV_LINKS.iter().enumerate() {
            x += 1;
            let width = link.width() + 2;
            if (x..x + width).contains(&(column as usize)) {
                return Some(i);
            }
            x += width;
        }
        None
    }

    /// Whether `column` hits the menu button on narrow terminals
    pub fn is_menu_button(column: u16, width: u16) -> bool {
        column as usize >= (width as usize).saturating_sub(MENU_BUTTON.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_hit_testing() {
        let first = BRAND.width() as u16 + 1;
        assert_eq!(NavbarWidget::link_at(0), None);
        assert_eq!(NavbarWidget::link_at(first), Some(0));
        // " Home " is six columns, then a separator
        assert_eq!(NavbarWidget::link_at(first + 6), None);
        assert_eq!(NavbarWidget::link_at(first + 7), Some(1));
        assert_eq!(NavbarWidget::link_at(500), None);
    }

    #[test]
    fn test_menu_button_hit_testing() {
        assert!(NavbarWidget::is_menu_button(79, 80));
        assert!(!NavbarWidget::is_menu_button(10, 80));
    }
}
