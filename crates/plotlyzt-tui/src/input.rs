use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    ScrollPageDown,
    ScrollPageUp,
    JumpToTop,
    JumpToBottom,
    NavLink(usize), // 1-6: jump straight to a section
    NextLink,
    PrevLink,
    FollowLink,
    ToggleMenu,
    GetStarted,
    ViewDemo,
    CycleChartView,
    MarkingPoint,
    MarkingRange,
    StartProcessing,
    ToggleHelp,
    SkipIntro,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        _ => {}
    }

    // Any other key skips the splash
    if app.is_loading() {
        return Action::SkipIntro;
    }

    if app.show_help {
        return Action::ToggleHelp;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,

        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,
        (KeyCode::PageDown, _) => Action::ScrollPageDown,
        (KeyCode::PageUp, _) => Action::ScrollPageUp,
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ScrollPageDown,

        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char(c @ '1'..='6'), KeyModifiers::NONE) => {
            Action::NavLink(c as usize - '1' as usize)
        }
        (KeyCode::Tab, _) => Action::NextLink,
        (KeyCode::BackTab, _) => Action::PrevLink,
        (KeyCode::Enter, _) => Action::FollowLink,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::ToggleMenu,
        (KeyCode::Esc, _) if app.page.nav().is_menu_open() => Action::ToggleMenu,

        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::GetStarted,
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::ViewDemo,

        (KeyCode::Char('c'), KeyModifiers::NONE) => Action::CycleChartView,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::MarkingPoint,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::MarkingRange,
        (KeyCode::Char('u'), KeyModifiers::NONE) => Action::StartProcessing,

        (KeyCode::Char('?'), _) => Action::ToggleHelp,

        _ => Action::None,
    }
}
