use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    frame_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self::with_animation_fps(tick_rate_ms, 60)
    }

    /// Poll faster than the tick rate while something is animating
    pub fn with_animation_fps(tick_rate_ms: u64, fps: u32) -> Self {
        let frame_ms = if fps == 0 { 16 } else { (1000 / fps as u64).max(1) };
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_rate: Duration::from_millis(frame_ms),
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.frame_rate)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(Some(AppEvent::Tick));
        }
        let event = match event::read()? {
            // Release events show up on some platforms
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => mouse_event(mouse),
            Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
            _ => None,
        };
        Ok(event)
    }
}

fn mouse_event(mouse: MouseEvent) -> Option<AppEvent> {
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(AppEvent::Wheel(1)),
        MouseEventKind::ScrollUp => Some(AppEvent::Wheel(-1)),
        MouseEventKind::Down(MouseButton::Left) => Some(AppEvent::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Mouse wheel steps, positive is down
    Wheel(i32),
    Click { column: u16, row: u16 },
    Resize(u16, u16),
    Tick,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind) -> MouseEvent {
        MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_mouse_mapping() {
        assert!(matches!(mouse_event(mouse(MouseEventKind::ScrollDown)), Some(AppEvent::Wheel(1))));
        assert!(matches!(mouse_event(mouse(MouseEventKind::ScrollUp)), Some(AppEvent::Wheel(-1))));
        assert!(matches!(
            mouse_event(mouse(MouseEventKind::Down(MouseButton::Left))),
            Some(AppEvent::Click { column: 3, row: 4 })
        ));
        assert!(mouse_event(mouse(MouseEventKind::Moved)).is_none());
    }

    #[test]
    fn test_frame_rate_from_fps() {
        let handler = EventHandler::with_animation_fps(100, 50);
        assert_eq!(handler.frame_rate, Duration::from_millis(20));
        let handler = EventHandler::with_animation_fps(100, 0);
        assert_eq!(handler.frame_rate, Duration::from_millis(16));
    }
}
